use crate::{
    db::DbPool,
    entities::{
        department::{self, Entity as Department},
        employee::{self, Entity as Employee},
        employee_device,
        position::{self, Entity as Position},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::{AssignmentStatus, EmployeeStatus},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeeInput {
    #[validate(length(min = 1, message = "Employee code cannot be empty"))]
    pub employee_code: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub full_name: String,
    pub department_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    pub date_deployed: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployeeInput {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub full_name: String,
    pub department_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    pub status: Option<EmployeeStatus>,
    pub date_deployed: Option<NaiveDate>,
    pub date_left: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmployeeFilters {
    pub status: Option<EmployeeStatus>,
    pub department_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    /// Case-insensitive substring match on code or name
    pub search: Option<String>,
}

/// Employee row with department and position names resolved.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: employee::Model,
    pub department_name: Option<String>,
    pub position_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NamedLookupInput {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
}

/// Lookup row plus its live employee count, used by the delete guards and
/// the org screens.
#[derive(Debug, Serialize, ToSchema)]
pub struct LookupView {
    pub id: Uuid,
    pub name: String,
    pub employee_count: u64,
}

/// Employee, department, and position access with referential delete guards.
#[derive(Clone)]
pub struct DirectoryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl DirectoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn name_maps(
        &self,
    ) -> Result<(HashMap<Uuid, String>, HashMap<Uuid, String>), ServiceError> {
        let db = self.db_pool.as_ref();
        let departments = Department::find()
            .all(db)
            .await?
            .into_iter()
            .map(|d| (d.department_id, d.department_name))
            .collect();
        let positions = Position::find()
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.position_id, p.position_name))
            .collect();
        Ok((departments, positions))
    }

    fn enrich(
        model: employee::Model,
        departments: &HashMap<Uuid, String>,
        positions: &HashMap<Uuid, String>,
    ) -> EmployeeView {
        let department_name = model
            .department_id
            .and_then(|id| departments.get(&id).cloned());
        let position_name = model.position_id.and_then(|id| positions.get(&id).cloned());
        EmployeeView {
            employee: model,
            department_name,
            position_name,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_employees(
        &self,
        filters: EmployeeFilters,
    ) -> Result<Vec<EmployeeView>, ServiceError> {
        let mut query = Employee::find().order_by_asc(employee::Column::EmployeeCode);
        if let Some(status) = filters.status {
            query = query.filter(employee::Column::Status.eq(status.as_str()));
        }
        if let Some(department_id) = filters.department_id {
            query = query.filter(employee::Column::DepartmentId.eq(department_id));
        }
        if let Some(position_id) = filters.position_id {
            query = query.filter(employee::Column::PositionId.eq(position_id));
        }
        if let Some(search) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(
                employee::Column::EmployeeCode
                    .like(&pattern)
                    .or(employee::Column::FullName.like(&pattern)),
            );
        }

        let rows = query.all(self.db_pool.as_ref()).await?;
        let (departments, positions) = self.name_maps().await?;
        Ok(rows
            .into_iter()
            .map(|m| Self::enrich(m, &departments, &positions))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get_employee(&self, employee_id: Uuid) -> Result<EmployeeView, ServiceError> {
        let model = Employee::find_by_id(employee_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Employee {} not found", employee_id))
            })?;
        let (departments, positions) = self.name_maps().await?;
        Ok(Self::enrich(model, &departments, &positions))
    }

    #[instrument(skip(self, input))]
    pub async fn create_employee(
        &self,
        input: CreateEmployeeInput,
    ) -> Result<EmployeeView, ServiceError> {
        input.validate()?;

        let model = employee::ActiveModel {
            employee_id: Set(Uuid::new_v4()),
            employee_code: Set(input.employee_code),
            full_name: Set(input.full_name),
            department_id: Set(input.department_id),
            position_id: Set(input.position_id),
            status: Set(EmployeeStatus::Active.as_str().to_owned()),
            date_deployed: Set(input.date_deployed),
            date_left: Set(None),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await?;

        info!(employee_id = %model.employee_id, code = %model.employee_code, "employee created");
        self.event_sender
            .send(Event::EmployeeCreated(model.employee_id))
            .await
            .map_err(ServiceError::EventError)?;

        let (departments, positions) = self.name_maps().await?;
        Ok(Self::enrich(model, &departments, &positions))
    }

    #[instrument(skip(self, input))]
    pub async fn update_employee(
        &self,
        employee_id: Uuid,
        input: UpdateEmployeeInput,
    ) -> Result<EmployeeView, ServiceError> {
        input.validate()?;

        let model = Employee::find_by_id(employee_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Employee {} not found", employee_id))
            })?;

        let mut active: employee::ActiveModel = model.into();
        active.full_name = Set(input.full_name);
        active.department_id = Set(input.department_id);
        active.position_id = Set(input.position_id);
        if let Some(status) = input.status {
            active.status = Set(status.as_str().to_owned());
        }
        active.date_deployed = Set(input.date_deployed);
        active.date_left = Set(input.date_left);
        let model = active.update(self.db_pool.as_ref()).await?;

        let (departments, positions) = self.name_maps().await?;
        Ok(Self::enrich(model, &departments, &positions))
    }

    /// Employees holding a device cannot be deleted; the assignment has to be
    /// returned first.
    #[instrument(skip(self))]
    pub async fn delete_employee(&self, employee_id: Uuid) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        Employee::find_by_id(employee_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Employee {} not found", employee_id))
            })?;

        let active_assignments = employee_device::Entity::find()
            .filter(employee_device::Column::EmployeeId.eq(employee_id))
            .filter(employee_device::Column::Status.eq(AssignmentStatus::InUse.as_str()))
            .count(db)
            .await?;
        if active_assignments > 0 {
            return Err(ServiceError::Conflict(format!(
                "Cannot delete employee with {} device(s) still deployed",
                active_assignments
            )));
        }

        Employee::delete_by_id(employee_id).exec(db).await?;
        info!(employee_id = %employee_id, "employee deleted");
        self.event_sender
            .send(Event::EmployeeDeleted(employee_id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_departments(
        &self,
        search: Option<String>,
    ) -> Result<Vec<LookupView>, ServiceError> {
        let db = self.db_pool.as_ref();
        let mut query = Department::find().order_by_asc(department::Column::DepartmentName);
        if let Some(search) = search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(department::Column::DepartmentName.like(&pattern));
        }
        let departments = query.all(db).await?;

        let mut views = Vec::with_capacity(departments.len());
        for dept in departments {
            let employee_count = Employee::find()
                .filter(employee::Column::DepartmentId.eq(dept.department_id))
                .count(db)
                .await?;
            views.push(LookupView {
                id: dept.department_id,
                name: dept.department_name,
                employee_count,
            });
        }
        Ok(views)
    }

    #[instrument(skip(self, input))]
    pub async fn create_department(
        &self,
        input: NamedLookupInput,
    ) -> Result<LookupView, ServiceError> {
        input.validate()?;
        let model = department::ActiveModel {
            department_id: Set(Uuid::new_v4()),
            department_name: Set(input.name),
        }
        .insert(self.db_pool.as_ref())
        .await?;
        Ok(LookupView {
            id: model.department_id,
            name: model.department_name,
            employee_count: 0,
        })
    }

    #[instrument(skip(self, input))]
    pub async fn update_department(
        &self,
        department_id: Uuid,
        input: NamedLookupInput,
    ) -> Result<LookupView, ServiceError> {
        input.validate()?;
        let db = self.db_pool.as_ref();
        let model = Department::find_by_id(department_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Department {} not found", department_id))
            })?;

        let mut active: department::ActiveModel = model.into();
        active.department_name = Set(input.name);
        let model = active.update(db).await?;

        let employee_count = Employee::find()
            .filter(employee::Column::DepartmentId.eq(department_id))
            .count(db)
            .await?;
        Ok(LookupView {
            id: model.department_id,
            name: model.department_name,
            employee_count,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_department(&self, department_id: Uuid) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        Department::find_by_id(department_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Department {} not found", department_id))
            })?;

        let employee_count = Employee::find()
            .filter(employee::Column::DepartmentId.eq(department_id))
            .count(db)
            .await?;
        if employee_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "Cannot delete department with {} assigned employees",
                employee_count
            )));
        }

        Department::delete_by_id(department_id).exec(db).await?;
        info!(department_id = %department_id, "department deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_positions(
        &self,
        search: Option<String>,
    ) -> Result<Vec<LookupView>, ServiceError> {
        let db = self.db_pool.as_ref();
        let mut query = Position::find().order_by_asc(position::Column::PositionName);
        if let Some(search) = search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(position::Column::PositionName.like(&pattern));
        }
        let positions = query.all(db).await?;

        let mut views = Vec::with_capacity(positions.len());
        for pos in positions {
            let employee_count = Employee::find()
                .filter(employee::Column::PositionId.eq(pos.position_id))
                .count(db)
                .await?;
            views.push(LookupView {
                id: pos.position_id,
                name: pos.position_name,
                employee_count,
            });
        }
        Ok(views)
    }

    #[instrument(skip(self, input))]
    pub async fn create_position(
        &self,
        input: NamedLookupInput,
    ) -> Result<LookupView, ServiceError> {
        input.validate()?;
        let model = position::ActiveModel {
            position_id: Set(Uuid::new_v4()),
            position_name: Set(input.name),
        }
        .insert(self.db_pool.as_ref())
        .await?;
        Ok(LookupView {
            id: model.position_id,
            name: model.position_name,
            employee_count: 0,
        })
    }

    #[instrument(skip(self, input))]
    pub async fn update_position(
        &self,
        position_id: Uuid,
        input: NamedLookupInput,
    ) -> Result<LookupView, ServiceError> {
        input.validate()?;
        let db = self.db_pool.as_ref();
        let model = Position::find_by_id(position_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Position {} not found", position_id))
            })?;

        let mut active: position::ActiveModel = model.into();
        active.position_name = Set(input.name);
        let model = active.update(db).await?;

        let employee_count = Employee::find()
            .filter(employee::Column::PositionId.eq(position_id))
            .count(db)
            .await?;
        Ok(LookupView {
            id: model.position_id,
            name: model.position_name,
            employee_count,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_position(&self, position_id: Uuid) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        Position::find_by_id(position_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Position {} not found", position_id))
            })?;

        let employee_count = Employee::find()
            .filter(employee::Column::PositionId.eq(position_id))
            .count(db)
            .await?;
        if employee_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "Cannot delete position with {} assigned employees",
                employee_count
            )));
        }

        Position::delete_by_id(position_id).exec(db).await?;
        info!(position_id = %position_id, "position deleted");
        Ok(())
    }
}
