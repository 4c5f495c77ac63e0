use std::fmt;
use std::path::Path;

use polars::prelude::*;
use serde::Deserialize;

use crate::error::ConsistencyError;
use crate::loader::as_filled_strings;
use crate::schema::columns;

/// Semantic role a user assigns to one input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Identifier,
    ShipmentType,
    BolId,
    /// Destination ETA.
    FieldA,
    /// Destination ATA.
    FieldB,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Identifier,
        Role::ShipmentType,
        Role::BolId,
        Role::FieldA,
        Role::FieldB,
    ];

    /// Label shown next to the column selector.
    pub fn label(self) -> &'static str {
        match self {
            Role::Identifier => "Identifier",
            Role::ShipmentType => "Shipment type",
            Role::BolId => "BOL ID",
            Role::FieldA => "AJ (ETA Destino)",
            Role::FieldB => "AK (ATA Destino)",
        }
    }

    /// Name of the normalized working column this role is projected into.
    pub fn working_column(self) -> &'static str {
        match self {
            Role::Identifier => columns::IDENTIFIER,
            Role::ShipmentType => columns::SHIPMENT_TYPE,
            Role::BolId => columns::BOL_ID,
            Role::FieldA => columns::AJ,
            Role::FieldB => columns::AK,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Column-name selection for each of the five roles.
///
/// The same column may back several roles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleMapping {
    pub identifier: String,
    pub shipment_type: String,
    pub bol_id: String,
    #[serde(alias = "aj")]
    pub field_a: String,
    #[serde(alias = "ak")]
    pub field_b: String,
}

impl RoleMapping {
    pub fn new(
        identifier: impl Into<String>,
        shipment_type: impl Into<String>,
        bol_id: impl Into<String>,
        field_a: impl Into<String>,
        field_b: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            shipment_type: shipment_type.into(),
            bol_id: bol_id.into(),
            field_a: field_a.into(),
            field_b: field_b.into(),
        }
    }

    pub fn column(&self, role: Role) -> &str {
        match role {
            Role::Identifier => &self.identifier,
            Role::ShipmentType => &self.shipment_type,
            Role::BolId => &self.bol_id,
            Role::FieldA => &self.field_a,
            Role::FieldB => &self.field_b,
        }
    }

    /// Check that every role resolves to a column of `df`.
    pub fn validate(&self, df: &DataFrame) -> Result<(), ConsistencyError> {
        let schema = df.schema();
        for role in Role::ALL {
            let column = self.column(role);
            if !schema.contains(column) {
                return Err(ConsistencyError::Configuration {
                    role,
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Project the role columns into the fixed working columns
    /// `bol_id, identifier, shipment_type, aj, ak`, all String with no nulls.
    pub fn project(&self, df: &DataFrame) -> Result<DataFrame, ConsistencyError> {
        self.validate(df)?;

        let order = [
            Role::BolId,
            Role::Identifier,
            Role::ShipmentType,
            Role::FieldA,
            Role::FieldB,
        ];
        let mut projected = Vec::with_capacity(order.len());
        for role in order {
            let mut column = as_filled_strings(df.column(self.column(role))?)?;
            column.rename(role.working_column().into());
            projected.push(column);
        }

        Ok(DataFrame::new(projected)?)
    }

    /// Load a mapping from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConsistencyError> {
        PartialRoleMapping::from_toml_file(path)?.resolve()
    }
}

/// A mapping under construction, e.g. a TOML file merged with CLI overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialRoleMapping {
    pub identifier: Option<String>,
    pub shipment_type: Option<String>,
    pub bol_id: Option<String>,
    #[serde(alias = "aj")]
    pub field_a: Option<String>,
    #[serde(alias = "ak")]
    pub field_b: Option<String>,
}

impl PartialRoleMapping {
    pub fn from_toml_str(text: &str) -> Result<Self, ConsistencyError> {
        toml::from_str(text).map_err(|e| ConsistencyError::Config(e.to_string()))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConsistencyError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| ConsistencyError::Config(format!("{}: {e}", path.display())))
    }

    /// Values set in `other` win.
    pub fn merge(self, other: PartialRoleMapping) -> Self {
        Self {
            identifier: other.identifier.or(self.identifier),
            shipment_type: other.shipment_type.or(self.shipment_type),
            bol_id: other.bol_id.or(self.bol_id),
            field_a: other.field_a.or(self.field_a),
            field_b: other.field_b.or(self.field_b),
        }
    }

    pub fn resolve(self) -> Result<RoleMapping, ConsistencyError> {
        Ok(RoleMapping {
            identifier: self
                .identifier
                .ok_or(ConsistencyError::MissingRole(Role::Identifier))?,
            shipment_type: self
                .shipment_type
                .ok_or(ConsistencyError::MissingRole(Role::ShipmentType))?,
            bol_id: self.bol_id.ok_or(ConsistencyError::MissingRole(Role::BolId))?,
            field_a: self
                .field_a
                .ok_or(ConsistencyError::MissingRole(Role::FieldA))?,
            field_b: self
                .field_b
                .ok_or(ConsistencyError::MissingRole(Role::FieldB))?,
        })
    }
}
