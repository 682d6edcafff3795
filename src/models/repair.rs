use garde::Validate;
use serde::{Deserialize, Serialize};

/// A stage in the repair workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairStage {
    #[serde(rename = "analyzing")]
    Analyzing,
    #[serde(rename = "repairing")]
    Repairing,
    #[serde(rename = "ready to pickup")]
    ReadyToPickup,
}

/// One status change of a repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepairStatus {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "RepairID")]
    pub repair_id: i64,
    pub status: String,
    pub updated_at: String,
    pub updated_by: String,
}

/// A repair ticket as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Repair {
    #[serde(rename = "ID")]
    pub id: i64,
    pub user_email: String,
    pub user_phone: String,
    #[serde(default)]
    pub repair_status: Vec<RepairStatus>,
    pub product: String,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
    pub description: String,
}

/// The repair dialog.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RepairForm {
    #[garde(email)]
    pub user_email: String,
    #[garde(length(min = 1))]
    pub user_phone: String,
    #[garde(length(min = 1))]
    pub product: String,
    #[garde(length(min = 1))]
    pub category: String,
    #[garde(skip)]
    pub description: String,
}

/// A new status for an existing repair.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RepairStatusForm {
    #[garde(range(min = 1))]
    pub repair_id: i64,
    #[garde(skip)]
    pub status: RepairStage,
}

/// Changes the stage of an existing status entry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RepairStatusUpdateForm {
    #[garde(skip)]
    pub status: RepairStage,
}
