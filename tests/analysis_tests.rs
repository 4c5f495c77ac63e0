use std::collections::BTreeSet;
use std::io::{Cursor, Read};

use bol_consistency::schema::{cases, members};
use bol_consistency::{
    build_archive, classify, read_csv_bytes, to_csv_bytes, ConsistencyError, Role, RoleMapping,
};

const SHIPMENTS: &str = "\
Container No,Tipo Embarque,BL,ETA Destino,ATA Destino,Notes
C1,Container,A,2024-03-01,2024-03-02,
C2,Container,A,2024-03-01,2024-03-03,late
C3,Bulk,A,x,y,
C4,Container,B,,,
C5,Container,,2024-04-01,,
";

fn mapping() -> RoleMapping {
    RoleMapping::new(
        "Container No",
        "Tipo Embarque",
        "BL",
        "ETA Destino",
        "ATA Destino",
    )
}

fn read_member(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut member = archive.by_name(name).unwrap();
    let mut text = String::new();
    member.read_to_string(&mut text).unwrap();
    text
}

#[test]
fn csv_to_archive_end_to_end() {
    let table = read_csv_bytes(SHIPMENTS.as_bytes()).unwrap();
    let tables = classify(&table, &mapping())
        .unwrap()
        .into_classified()
        .unwrap();
    let archive = build_archive(&tables).unwrap();

    let zip = zip::ZipArchive::new(Cursor::new(archive.as_slice())).unwrap();
    let names: BTreeSet<&str> = zip.file_names().collect();
    assert_eq!(names, members::ALL.into_iter().collect());

    let unique = read_member(&archive, members::UNIQUE_BOLS);
    assert_eq!(unique.lines().next(), Some("bol_id"));
    assert_eq!(unique.lines().count(), 4); // header + A, B, blank

    for member in [
        members::DIFFERENT_AJ,
        members::DIFFERENT_AK,
        members::SAME_AJ,
        members::SAME_AK,
    ] {
        let text = read_member(&archive, member);
        assert_eq!(
            text.lines().next(),
            Some("bol_id,identifier,shipment_type,aj,ak"),
            "{member}"
        );
    }

    let different_ak = read_member(&archive, members::DIFFERENT_AK);
    assert!(different_ak.contains("A,C1,Container,2024-03-01,2024-03-02"));
    assert!(different_ak.contains("A,C2,Container,2024-03-01,2024-03-03"));
    assert!(!different_ak.contains("C3"));

    let summary = read_member(&archive, members::SUMMARY);
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines[0], "case,description,count");
    assert_eq!(lines.len(), 7);
    assert!(lines[1].starts_with(cases::TOTAL_CONTAINER_ROWS));
    assert!(lines[1].ends_with(",4"));
    assert!(lines[2].starts_with(cases::UNIQUE_BOLS));
    assert!(lines[2].ends_with(",3"));
    assert!(lines[4].starts_with(cases::BOLS_DIFFERENT_AJ));
    assert!(lines[4].ends_with(",0"));
    assert!(lines[6].starts_with(cases::BOLS_DIFFERENT_AK));
    assert!(lines[6].ends_with(",1"));
}

#[test]
fn blank_rows_are_written_with_empty_fields() {
    let table = read_csv_bytes(SHIPMENTS.as_bytes()).unwrap();
    let tables = classify(&table, &mapping())
        .unwrap()
        .into_classified()
        .unwrap();
    let archive = build_archive(&tables).unwrap();

    let same_ak = read_member(&archive, members::SAME_AK);
    assert_eq!(
        same_ak,
        "bol_id,identifier,shipment_type,aj,ak\n\
         B,C4,Container,,\n\
         ,C5,Container,2024-04-01,\n"
    );
}

#[test]
fn missing_value_tokens_match_blank_cells() {
    let csv = "id,type,bol,eta,ata\n\
               1,Container,A,NA,\n\
               2,Container,A,,null\n\
               3,Container,N/A,1,1\n\
               4,Container,,2,1\n";
    let table = read_csv_bytes(csv.as_bytes()).unwrap();
    let mapping = RoleMapping::new("id", "type", "bol", "eta", "ata");
    let tables = classify(&table, &mapping)
        .unwrap()
        .into_classified()
        .unwrap();

    // "N/A" and blank share one BOL group; "NA" and blank are one ETA value.
    assert_eq!(tables.counts.unique_bols, 2);
    assert_eq!(tables.counts.bols_different_aj, 1);
    assert_eq!(tables.counts.bols_same_ak, 2);
    assert_eq!(tables.counts.get(cases::BOLS_SAME_AJ), Some(1));
    let different_aj = to_csv_bytes(&tables.different_aj).unwrap();
    assert_eq!(
        String::from_utf8(different_aj).unwrap(),
        "bol_id,identifier,shipment_type,aj,ak\n,3,Container,1,1\n,4,Container,2,1\n"
    );
}

#[test]
fn summary_counts_partition_unique_bols() {
    let table = read_csv_bytes(SHIPMENTS.as_bytes()).unwrap();
    let tables = classify(&table, &mapping())
        .unwrap()
        .into_classified()
        .unwrap();
    let counts = tables.counts;

    assert_eq!(counts.total_container_rows, 4);
    assert_eq!(counts.unique_bols, 3);
    assert_eq!(
        counts.bols_same_aj + counts.bols_different_aj,
        counts.unique_bols
    );
    assert_eq!(
        counts.bols_same_ak + counts.bols_different_ak,
        counts.unique_bols
    );
    assert_eq!(counts.get(cases::BOLS_DIFFERENT_AK), Some(1));
}

#[test]
fn classification_is_idempotent() {
    let table = read_csv_bytes(SHIPMENTS.as_bytes()).unwrap();
    let first = classify(&table, &mapping()).unwrap().into_classified().unwrap();
    let second = classify(&table, &mapping()).unwrap().into_classified().unwrap();

    let pairs = first
        .member_tables()
        .into_iter()
        .zip(second.member_tables());
    for ((name_a, a), (name_b, b)) in pairs {
        assert_eq!(name_a, name_b);
        assert_eq!(to_csv_bytes(a).unwrap(), to_csv_bytes(b).unwrap(), "{name_a}");
    }
}

#[test]
fn no_container_rows_produces_no_tables() {
    let csv = "id,type,bol,eta,ata\n1,Bulk,A,1,1\n2,container,A,1,1\n";
    let table = read_csv_bytes(csv.as_bytes()).unwrap();
    let mapping = RoleMapping::new("id", "type", "bol", "eta", "ata");
    let analysis = classify(&table, &mapping).unwrap();

    assert!(analysis.is_empty());
    assert!(analysis.classified().is_none());
}

#[test]
fn unknown_column_is_a_configuration_error() {
    let table = read_csv_bytes(SHIPMENTS.as_bytes()).unwrap();
    let mut bad = mapping();
    bad.field_a = "AJ".into();

    match classify(&table, &bad).unwrap_err() {
        ConsistencyError::Configuration { role, column } => {
            assert_eq!(role, Role::FieldA);
            assert_eq!(column, "AJ");
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn header_only_csv_is_empty_not_an_error() {
    let table = read_csv_bytes(b"id,type,bol,eta,ata\n").unwrap();
    let mapping = RoleMapping::new("id", "type", "bol", "eta", "ata");
    let analysis = classify(&table, &mapping).unwrap();
    assert!(analysis.is_empty());
}
