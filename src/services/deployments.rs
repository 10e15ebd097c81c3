use crate::{
    commands::deployments::{
        DeployDeviceCommand, DeployDeviceResult, ReturnDeviceCommand, ReturnDeviceResult,
    },
    commands::Command,
    db::DbPool,
    entities::{
        department::Entity as Department,
        desktop::{self, Entity as Desktop},
        desktop_memory::{self, Entity as DesktopMemory},
        desktop_storage::{self, Entity as DesktopStorage},
        employee::Entity as Employee,
        employee_device::{self, Entity as EmployeeDevice},
        employee_monitor::{self, Entity as EmployeeMonitor},
        laptop::{self, Entity as Laptop},
        monitor::{self, Entity as Monitor},
    },
    errors::ServiceError,
    events::EventSender,
    models::{AssignmentStatus, DeviceKind, DeviceRef, DeviceStatus},
};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct HistoryFilters {
    pub device_type: Option<DeviceKind>,
    pub status: Option<AssignmentStatus>,
    /// Case-insensitive substring match on employee code or name
    pub search: Option<String>,
    /// Only assignments issued within the last N days
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonitorSummary {
    pub monitor_id: Uuid,
    pub asset_id: String,
}

/// Pick-list entry for the deploy form: an available device or monitor with
/// enough detail to tell identical models apart.
#[derive(Debug, Serialize, ToSchema)]
pub struct DevicePick {
    pub device_id: Uuid,
    pub asset_id: String,
    pub description: Option<String>,
}

/// Full hardware detail behind a device reference, shaped by kind.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum DeviceSpecs {
    Laptop(laptop::Model),
    Desktop {
        #[serde(flatten)]
        desktop: desktop::Model,
        memory: Vec<desktop_memory::Model>,
        storage: Vec<desktop_storage::Model>,
    },
}

/// Aggregates over closed assignment episodes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReturnedStats {
    pub total: u64,
    pub laptops: u64,
    pub desktops: u64,
    /// Returned within the last 7 days
    pub this_week: u64,
    /// Returned within the last 30 days
    pub this_month: u64,
    pub average_usage_days: Option<f64>,
}

/// Device fields carried onto an assignment view.
struct DeviceSummary {
    asset_id: String,
    brand: Option<String>,
    model: Option<String>,
    status: String,
}

/// One assignment episode joined with employee, department, device tag, and
/// monitor details.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeploymentView {
    pub employee_device_id: Uuid,
    pub employee_id: Uuid,
    pub employee_code: String,
    pub employee_name: String,
    pub department_name: Option<String>,
    pub device_type: DeviceKind,
    pub device_id: Uuid,
    /// Resolved human asset tag; absent if the device row has since vanished
    pub asset_id: Option<String>,
    pub device_brand: Option<String>,
    /// Brand/model for laptops, processor for desktops
    pub device_model: Option<String>,
    pub device_status: Option<String>,
    pub status: String,
    pub date_issued: NaiveDate,
    pub date_returned: Option<NaiveDate>,
    pub monitors: Vec<MonitorSummary>,
    /// `date_returned - date_issued`, only for closed episodes
    pub usage_days: Option<i64>,
}

/// Orchestrates the deploy/return lifecycle and serves the assignment
/// ledger queries.
#[derive(Clone)]
pub struct DeploymentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl DeploymentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn deploy_device(
        &self,
        command: DeployDeviceCommand,
    ) -> Result<DeployDeviceResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn return_device(
        &self,
        employee_device_id: Uuid,
    ) -> Result<ReturnDeviceResult, ServiceError> {
        ReturnDeviceCommand { employee_device_id }
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Everything currently out in the field, newest first. The only source
    /// of truth for "who has what right now".
    #[instrument(skip(self))]
    pub async fn current_deployments(&self) -> Result<Vec<DeploymentView>, ServiceError> {
        let rows = EmployeeDevice::find()
            .filter(employee_device::Column::Status.eq(AssignmentStatus::InUse.as_str()))
            .order_by_desc(employee_device::Column::DateIssued)
            .all(self.db_pool.as_ref())
            .await?;
        self.enrich(rows).await
    }

    #[instrument(skip(self))]
    pub async fn deployment_history(
        &self,
        filters: HistoryFilters,
    ) -> Result<Vec<DeploymentView>, ServiceError> {
        let mut query = EmployeeDevice::find().order_by_desc(employee_device::Column::DateIssued);
        if let Some(device_type) = filters.device_type {
            query = query.filter(employee_device::Column::DeviceType.eq(device_type.to_string()));
        }
        if let Some(status) = filters.status {
            query = query.filter(employee_device::Column::Status.eq(status.as_str()));
        }
        if let Some(days) = filters.days {
            let cutoff = Utc::now().date_naive() - Duration::days(days);
            query = query.filter(employee_device::Column::DateIssued.gte(cutoff));
        }

        let rows = query.all(self.db_pool.as_ref()).await?;
        let mut views = self.enrich(rows).await?;

        if let Some(search) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let needle = search.trim().to_lowercase();
            views.retain(|v| {
                v.employee_code.to_lowercase().contains(&needle)
                    || v.employee_name.to_lowercase().contains(&needle)
            });
        }
        Ok(views)
    }

    /// Closed episodes, most recently returned first.
    #[instrument(skip(self))]
    pub async fn returned_devices(&self) -> Result<Vec<DeploymentView>, ServiceError> {
        let rows = EmployeeDevice::find()
            .filter(employee_device::Column::Status.eq(AssignmentStatus::Returned.as_str()))
            .order_by_desc(employee_device::Column::DateReturned)
            .all(self.db_pool.as_ref())
            .await?;
        self.enrich(rows).await
    }

    /// Joins each assignment row with its employee (+department), resolves
    /// the polymorphic device reference to an asset tag with a per-row
    /// lookup, and attaches monitor details.
    async fn enrich(
        &self,
        rows: Vec<employee_device::Model>,
    ) -> Result<Vec<DeploymentView>, ServiceError> {
        let db = self.db_pool.as_ref();

        let employees: HashMap<Uuid, (String, String, Option<Uuid>)> = Employee::find()
            .all(db)
            .await?
            .into_iter()
            .map(|e| {
                (
                    e.employee_id,
                    (e.employee_code, e.full_name, e.department_id),
                )
            })
            .collect();
        let departments: HashMap<Uuid, String> = Department::find()
            .all(db)
            .await?
            .into_iter()
            .map(|d| (d.department_id, d.department_name))
            .collect();

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let device = row.device_ref()?;
            let summary = self.resolve_device(device).await?;
            if summary.is_none() {
                warn!(
                    assignment = %row.employee_device_id,
                    device_id = %device.id(),
                    "assignment references a missing device row"
                );
            }

            let links = EmployeeMonitor::find()
                .filter(employee_monitor::Column::EmployeeDeviceId.eq(row.employee_device_id))
                .all(db)
                .await?;
            let mut monitors = Vec::with_capacity(links.len());
            for link in links {
                if let Some(monitor) = Monitor::find_by_id(link.monitor_id).one(db).await? {
                    monitors.push(MonitorSummary {
                        monitor_id: monitor.monitor_id,
                        asset_id: monitor.asset_id,
                    });
                }
            }

            let (employee_code, employee_name, department_id) = employees
                .get(&row.employee_id)
                .cloned()
                .unwrap_or_else(|| ("unknown".to_string(), "unknown".to_string(), None));
            let department_name = department_id.and_then(|id| departments.get(&id).cloned());

            let usage_days = row.date_returned.map(|ret| (ret - row.date_issued).num_days());

            let (asset_id, device_brand, device_model, device_status) = match summary {
                Some(s) => (Some(s.asset_id), s.brand, s.model, Some(s.status)),
                None => (None, None, None, None),
            };
            views.push(DeploymentView {
                employee_device_id: row.employee_device_id,
                employee_id: row.employee_id,
                employee_code,
                employee_name,
                department_name,
                device_type: device.kind(),
                device_id: device.id(),
                asset_id,
                device_brand,
                device_model,
                device_status,
                status: row.status,
                date_issued: row.date_issued,
                date_returned: row.date_returned,
                monitors,
                usage_days,
            });
        }
        Ok(views)
    }

    async fn resolve_device(
        &self,
        device: DeviceRef,
    ) -> Result<Option<DeviceSummary>, ServiceError> {
        let db = self.db_pool.as_ref();
        let summary = match device {
            DeviceRef::Laptop(id) => {
                Laptop::find_by_id(id).one(db).await?.map(|m| DeviceSummary {
                    asset_id: m.asset_id,
                    brand: m.brand,
                    model: m.model,
                    status: m.status,
                })
            }
            DeviceRef::Desktop(id) => {
                Desktop::find_by_id(id)
                    .one(db)
                    .await?
                    .map(|m| DeviceSummary {
                        asset_id: m.asset_id,
                        brand: None,
                        model: m.processor,
                        status: m.status,
                    })
            }
        };
        Ok(summary)
    }

    /// Devices of one kind that are free to go out, for the deploy form.
    #[instrument(skip(self))]
    pub async fn available_devices(
        &self,
        kind: DeviceKind,
    ) -> Result<Vec<DevicePick>, ServiceError> {
        let db = self.db_pool.as_ref();
        let picks = match kind {
            DeviceKind::Laptop => Laptop::find()
                .filter(laptop::Column::Status.eq(DeviceStatus::Available.as_str()))
                .order_by_asc(laptop::Column::AssetId)
                .all(db)
                .await?
                .into_iter()
                .map(|m| DevicePick {
                    device_id: m.laptop_id,
                    asset_id: m.asset_id,
                    description: join_detail(m.brand, m.model),
                })
                .collect(),
            DeviceKind::Desktop => Desktop::find()
                .filter(desktop::Column::Status.eq(DeviceStatus::Available.as_str()))
                .order_by_asc(desktop::Column::AssetId)
                .all(db)
                .await?
                .into_iter()
                .map(|m| DevicePick {
                    device_id: m.desktop_id,
                    asset_id: m.asset_id,
                    description: m.processor,
                })
                .collect(),
        };
        Ok(picks)
    }

    /// Monitors free to ride along on a deployment.
    #[instrument(skip(self))]
    pub async fn available_monitors(&self) -> Result<Vec<DevicePick>, ServiceError> {
        let picks = Monitor::find()
            .filter(monitor::Column::Status.eq(DeviceStatus::Available.as_str()))
            .order_by_asc(monitor::Column::AssetId)
            .all(self.db_pool.as_ref())
            .await?
            .into_iter()
            .map(|m| DevicePick {
                device_id: m.monitor_id,
                asset_id: m.asset_id,
                description: join_detail(m.brand, m.model),
            })
            .collect();
        Ok(picks)
    }

    /// Hardware detail for one device, with memory/storage children inlined
    /// for desktops.
    #[instrument(skip(self))]
    pub async fn device_specs(&self, device: DeviceRef) -> Result<DeviceSpecs, ServiceError> {
        let db = self.db_pool.as_ref();
        match device {
            DeviceRef::Laptop(id) => {
                let model = Laptop::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("Laptop {} not found", id)))?;
                Ok(DeviceSpecs::Laptop(model))
            }
            DeviceRef::Desktop(id) => {
                let model = Desktop::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("Desktop {} not found", id)))?;
                let memory = DesktopMemory::find()
                    .filter(desktop_memory::Column::DesktopId.eq(id))
                    .order_by_asc(desktop_memory::Column::SlotNumber)
                    .all(db)
                    .await?;
                let storage = DesktopStorage::find()
                    .filter(desktop_storage::Column::DesktopId.eq(id))
                    .all(db)
                    .await?;
                Ok(DeviceSpecs::Desktop {
                    desktop: model,
                    memory,
                    storage,
                })
            }
        }
    }

    /// Aggregate view over all closed episodes.
    #[instrument(skip(self))]
    pub async fn returned_stats(&self) -> Result<ReturnedStats, ServiceError> {
        let rows = EmployeeDevice::find()
            .filter(employee_device::Column::Status.eq(AssignmentStatus::Returned.as_str()))
            .all(self.db_pool.as_ref())
            .await?;

        let today = Utc::now().date_naive();
        let week_cutoff = today - Duration::days(7);
        let month_cutoff = today - Duration::days(30);

        let mut stats = ReturnedStats {
            total: rows.len() as u64,
            laptops: 0,
            desktops: 0,
            this_week: 0,
            this_month: 0,
            average_usage_days: None,
        };
        let mut usage_sum: i64 = 0;
        let mut usage_count: u64 = 0;
        for row in &rows {
            match row.device_ref()?.kind() {
                DeviceKind::Laptop => stats.laptops += 1,
                DeviceKind::Desktop => stats.desktops += 1,
            }
            if let Some(returned) = row.date_returned {
                if returned >= week_cutoff {
                    stats.this_week += 1;
                }
                if returned >= month_cutoff {
                    stats.this_month += 1;
                }
                usage_sum += (returned - row.date_issued).num_days();
                usage_count += 1;
            }
        }
        if usage_count > 0 {
            stats.average_usage_days = Some(usage_sum as f64 / usage_count as f64);
        }
        Ok(stats)
    }
}

fn join_detail(brand: Option<String>, model: Option<String>) -> Option<String> {
    match (brand, model) {
        (Some(b), Some(m)) => Some(format!("{} {}", b, m)),
        (Some(b), None) => Some(b),
        (None, Some(m)) => Some(m),
        (None, None) => None,
    }
}
