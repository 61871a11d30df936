use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(OperativeId);
id_newtype!(MissionId);
id_newtype!(TargetId);

/// Roster entity. Identifiers are assigned by the remote roster service on
/// creation and are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operative {
    pub id: OperativeId,
    pub name: String,
    pub years_of_experience: i32,
    pub breed: String,
    pub salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub mission_id: MissionId,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub complete: bool,
}

/// Declared for the mission subsystem, which lives behind the remote
/// collaborator; no mission logic runs client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operative_id: Option<OperativeId>,
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operative: Option<Operative>,
    pub targets: Vec<Target>,
}
