use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind tag for the polymorphic device reference stored on an assignment row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceKind {
    Laptop,
    Desktop,
}

/// Reference to a deployable device. The assignment table stores a kind tag
/// plus an id rather than a foreign key, because laptops and desktops live in
/// unrelated tables; keeping the pair as one variant type makes resolution
/// exhaustive instead of string-switched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceRef {
    Laptop(Uuid),
    Desktop(Uuid),
}

impl DeviceRef {
    pub fn new(kind: DeviceKind, id: Uuid) -> Self {
        match kind {
            DeviceKind::Laptop => DeviceRef::Laptop(id),
            DeviceKind::Desktop => DeviceRef::Desktop(id),
        }
    }

    pub fn kind(&self) -> DeviceKind {
        match self {
            DeviceRef::Laptop(_) => DeviceKind::Laptop,
            DeviceRef::Desktop(_) => DeviceKind::Desktop,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            DeviceRef::Laptop(id) | DeviceRef::Desktop(id) => *id,
        }
    }
}

/// Lifecycle status of a catalog device (laptop, desktop, or monitor).
///
/// `Defective` and `Retired` are set manually and exempt from the
/// deploy/return automation; `Retired` is only used for laptops.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Available,
    Issued,
    Defective,
    Retired,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Available => "available",
            DeviceStatus::Issued => "issued",
            DeviceStatus::Defective => "defective",
            DeviceStatus::Retired => "retired",
        }
    }
}

/// Status of one deployment episode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    InUse,
    Returned,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::InUse => "in_use",
            AssignmentStatus::Returned => "returned",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Resigned,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::Resigned => "resigned",
        }
    }
}

/// Service-request workflow: pending -> approved -> completed, or rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn device_kind_round_trips_through_strings() {
        assert_eq!(DeviceKind::Laptop.to_string(), "LAPTOP");
        assert_eq!(DeviceKind::from_str("DESKTOP").unwrap(), DeviceKind::Desktop);
        assert!(DeviceKind::from_str("MONITOR").is_err());
    }

    #[test]
    fn device_ref_exposes_kind_and_id() {
        let id = Uuid::new_v4();
        let device = DeviceRef::new(DeviceKind::Desktop, id);
        assert_eq!(device.kind(), DeviceKind::Desktop);
        assert_eq!(device.id(), id);
    }

    #[test]
    fn statuses_serialize_snake_case() {
        assert_eq!(AssignmentStatus::InUse.as_str(), "in_use");
        assert_eq!(DeviceStatus::Available.as_str(), "available");
        assert_eq!(
            AssignmentStatus::from_str("returned").unwrap(),
            AssignmentStatus::Returned
        );
    }
}
