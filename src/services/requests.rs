use crate::{
    db::DbPool,
    entities::{
        booking::{self, Entity as Booking},
        department::Entity as Department,
        employee::Entity as Employee,
        position::Entity as Position,
        service_request::{self, Entity as ServiceRequest},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::{DeviceKind, RequestStatus},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRequestInput {
    pub employee_id: Uuid,
    pub device_type: Option<DeviceKind>,
    pub device_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Request type cannot be empty"))]
    pub request_type: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBookingInput {
    pub booking_date: NaiveDate,
    #[validate(length(min = 1, message = "Booking time cannot be empty"))]
    pub booking_time: String,
    #[validate(length(min = 1, message = "Method cannot be empty"))]
    pub method: String,
    pub courier_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RequestFilters {
    pub status: Option<RequestStatus>,
    pub employee_id: Option<Uuid>,
    pub device_type: Option<DeviceKind>,
    pub request_type: Option<String>,
    /// Case-insensitive substring match on employee code or name
    pub search: Option<String>,
}

/// Request row with employee context resolved and its bookings attached.
#[derive(Debug, Serialize, ToSchema)]
pub struct RequestView {
    #[serde(flatten)]
    pub request: service_request::Model,
    pub employee_name: Option<String>,
    pub department_name: Option<String>,
    pub position_name: Option<String>,
    pub bookings: Vec<booking::Model>,
}

/// Booking joined with its request context, for the day schedule.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: booking::Model,
    pub request_type: Option<String>,
    pub employee_name: Option<String>,
}

/// Which workflow steps are legal from each state.
fn transition_allowed(from: RequestStatus, to: RequestStatus) -> bool {
    matches!(
        (from, to),
        (RequestStatus::Pending, RequestStatus::Approved)
            | (RequestStatus::Pending, RequestStatus::Rejected)
            | (RequestStatus::Approved, RequestStatus::Completed)
    )
}

#[derive(Clone)]
pub struct ServiceRequestService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ServiceRequestService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn view(&self, model: service_request::Model) -> Result<RequestView, ServiceError> {
        let db = self.db_pool.as_ref();
        let employee = Employee::find_by_id(model.employee_id).one(db).await?;
        let (employee_name, department_name, position_name) = match employee {
            Some(e) => {
                let department_name = match e.department_id {
                    Some(id) => Department::find_by_id(id)
                        .one(db)
                        .await?
                        .map(|d| d.department_name),
                    None => None,
                };
                let position_name = match e.position_id {
                    Some(id) => Position::find_by_id(id)
                        .one(db)
                        .await?
                        .map(|p| p.position_name),
                    None => None,
                };
                (Some(e.full_name), department_name, position_name)
            }
            None => (None, None, None),
        };
        let bookings = Booking::find()
            .filter(booking::Column::RequestId.eq(model.request_id))
            .order_by_asc(booking::Column::BookingDate)
            .all(db)
            .await?;
        Ok(RequestView {
            request: model,
            employee_name,
            department_name,
            position_name,
            bookings,
        })
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filters: RequestFilters) -> Result<Vec<RequestView>, ServiceError> {
        let db = self.db_pool.as_ref();
        let mut query = ServiceRequest::find().order_by_desc(service_request::Column::DateSubmitted);
        if let Some(status) = filters.status {
            query = query.filter(service_request::Column::Status.eq(status.as_str()));
        }
        if let Some(employee_id) = filters.employee_id {
            query = query.filter(service_request::Column::EmployeeId.eq(employee_id));
        }
        if let Some(device_type) = filters.device_type {
            query = query.filter(service_request::Column::DeviceType.eq(device_type.to_string()));
        }
        if let Some(request_type) = filters
            .request_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            query = query.filter(service_request::Column::RequestType.eq(request_type.trim()));
        }
        let rows = query.all(db).await?;

        // employee search needs names, so it applies after the join
        let matching_employees: Option<HashSet<Uuid>> = match filters
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            Some(search) => {
                let needle = search.trim().to_lowercase();
                Some(
                    Employee::find()
                        .all(db)
                        .await?
                        .into_iter()
                        .filter(|e| {
                            e.employee_code.to_lowercase().contains(&needle)
                                || e.full_name.to_lowercase().contains(&needle)
                        })
                        .map(|e| e.employee_id)
                        .collect(),
                )
            }
            None => None,
        };

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(matching) = &matching_employees {
                if !matching.contains(&row.employee_id) {
                    continue;
                }
            }
            views.push(self.view(row).await?);
        }
        Ok(views)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, request_id: Uuid) -> Result<RequestView, ServiceError> {
        let model = ServiceRequest::find_by_id(request_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Request {} not found", request_id)))?;
        self.view(model).await
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateRequestInput) -> Result<RequestView, ServiceError> {
        input.validate()?;

        if input.device_type.is_some() != input.device_id.is_some() {
            return Err(ServiceError::ValidationError(
                "device_type and device_id must be provided together".into(),
            ));
        }
        Employee::find_by_id(input.employee_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Employee {} not found", input.employee_id))
            })?;

        let model = service_request::ActiveModel {
            request_id: Set(Uuid::new_v4()),
            employee_id: Set(input.employee_id),
            device_type: Set(input.device_type.map(|k| k.to_string())),
            device_id: Set(input.device_id),
            request_type: Set(input.request_type),
            reason: Set(input.reason),
            status: Set(RequestStatus::Pending.as_str().to_owned()),
            date_submitted: Set(Utc::now()),
            date_completed: Set(None),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await?;

        info!(request_id = %model.request_id, "service request created");
        self.view(model).await
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        request_id: Uuid,
        new_status: RequestStatus,
    ) -> Result<RequestView, ServiceError> {
        use std::str::FromStr;

        let model = ServiceRequest::find_by_id(request_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Request {} not found", request_id)))?;

        let current = RequestStatus::from_str(&model.status).map_err(|_| {
            ServiceError::InternalError(format!(
                "Request {} has unknown status {:?}",
                request_id, model.status
            ))
        })?;
        if !transition_allowed(current, new_status) {
            return Err(ServiceError::InvalidOperation(format!(
                "Cannot move request from {} to {}",
                current, new_status
            )));
        }

        let mut active: service_request::ActiveModel = model.into();
        active.status = Set(new_status.as_str().to_owned());
        // both terminal states close the record
        if matches!(new_status, RequestStatus::Completed | RequestStatus::Rejected) {
            active.date_completed = Set(Some(Utc::now()));
        }
        let model = active.update(self.db_pool.as_ref()).await?;

        self.event_sender
            .send(Event::RequestStatusChanged {
                request_id,
                new_status: new_status.as_str().to_owned(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        self.view(model).await
    }

    /// Bookings only make sense once a request has been approved.
    #[instrument(skip(self, input))]
    pub async fn create_booking(
        &self,
        request_id: Uuid,
        input: CreateBookingInput,
    ) -> Result<booking::Model, ServiceError> {
        input.validate()?;

        let request = ServiceRequest::find_by_id(request_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Request {} not found", request_id)))?;
        if request.status != RequestStatus::Approved.as_str() {
            return Err(ServiceError::InvalidOperation(format!(
                "Cannot book against a request with status {}",
                request.status
            )));
        }

        let model = booking::ActiveModel {
            booking_id: Set(Uuid::new_v4()),
            request_id: Set(request_id),
            booking_date: Set(input.booking_date),
            booking_time: Set(input.booking_time),
            method: Set(input.method),
            courier_name: Set(input.courier_name),
            status: Set("scheduled".to_owned()),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await?;

        info!(booking_id = %model.booking_id, request_id = %request_id, "booking created");
        Ok(model)
    }

    /// The day's schedule: bookings dated today, earliest slot first.
    #[instrument(skip(self))]
    pub async fn todays_bookings(&self) -> Result<Vec<BookingView>, ServiceError> {
        let db = self.db_pool.as_ref();
        let today = Utc::now().date_naive();
        let rows = Booking::find()
            .filter(booking::Column::BookingDate.eq(today))
            .order_by_asc(booking::Column::BookingTime)
            .all(db)
            .await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let request = ServiceRequest::find_by_id(row.request_id).one(db).await?;
            let employee_name = match &request {
                Some(r) => Employee::find_by_id(r.employee_id)
                    .one(db)
                    .await?
                    .map(|e| e.full_name),
                None => None,
            };
            views.push(BookingView {
                booking: row,
                request_type: request.map(|r| r.request_type),
                employee_name,
            });
        }
        Ok(views)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, request_id: Uuid) -> Result<(), ServiceError> {
        ServiceRequest::find_by_id(request_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Request {} not found", request_id)))?;

        // bookings cascade with the request
        ServiceRequest::delete_by_id(request_id)
            .exec(self.db_pool.as_ref())
            .await?;
        info!(request_id = %request_id, "service request deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_requests_can_be_approved_or_rejected() {
        assert!(transition_allowed(
            RequestStatus::Pending,
            RequestStatus::Approved
        ));
        assert!(transition_allowed(
            RequestStatus::Pending,
            RequestStatus::Rejected
        ));
    }

    #[test]
    fn only_approved_requests_complete() {
        assert!(transition_allowed(
            RequestStatus::Approved,
            RequestStatus::Completed
        ));
        assert!(!transition_allowed(
            RequestStatus::Pending,
            RequestStatus::Completed
        ));
        assert!(!transition_allowed(
            RequestStatus::Rejected,
            RequestStatus::Completed
        ));
    }

    #[test]
    fn terminal_states_are_frozen() {
        assert!(!transition_allowed(
            RequestStatus::Completed,
            RequestStatus::Pending
        ));
        assert!(!transition_allowed(
            RequestStatus::Rejected,
            RequestStatus::Approved
        ));
    }
}
