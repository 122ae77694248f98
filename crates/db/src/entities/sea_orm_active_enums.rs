//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account activation status, backed by the `account_status` Postgres enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_status")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Created but not yet activated.
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Activated via the emailed PIN link.
    #[sea_orm(string_value = "active")]
    Active,
    /// Administratively blocked.
    #[sea_orm(string_value = "blocked")]
    Blocked,
}
