use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeaveDesk API",
        version = "1.0.0",
        description = "Leave management backend with Google Calendar mirroring"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Employees
        crate::handlers::employees_handler::get_employees,
        crate::handlers::employees_handler::replace_employees,
        crate::handlers::employees_handler::delete_employee,

        // Leave
        crate::handlers::leave_handler::submit_leave_request,

        // Google authorization flow
        crate::handlers::google_handler::get_auth_url,
        crate::handlers::google_handler::event_callback,
        crate::handlers::google_handler::token_callback,
        crate::handlers::google_handler::create_event,
        crate::handlers::google_handler::add_calendar_event,
    ),
    components(
        schemas(
            crate::models::Employee,
            crate::models::LeaveCategory,
            crate::models::LeaveRequestInput,
            crate::models::LeaveEvent,
            crate::handlers::google_handler::CreateEventRequest,
            crate::handlers::google_handler::AddCalendarEventRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "employees", description = "Roster administration"),
        (name = "leave", description = "Leave request submission"),
        (name = "google", description = "Calendar authorization flow"),
    )
)]
pub struct ApiDoc;
