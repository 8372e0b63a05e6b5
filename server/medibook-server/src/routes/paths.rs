//! Route path constants, shared between the router and the OpenAPI doc.

pub mod health {
    pub const HEALTH: &str = "/health";
}

pub mod auth {
    pub const REGISTER: &str = "/api/auth/register";
    pub const LOGIN: &str = "/api/auth/login";
    pub const ME: &str = "/api/auth/me";
    pub const FORGOT_PASSWORD: &str = "/api/auth/forgot-password";
    pub const RESET_PASSWORD: &str = "/api/auth/reset-password/:token";
}

pub mod doctors {
    pub const DOCTORS: &str = "/api/doctors";
    pub const DOCTOR_BY_ID: &str = "/api/doctors/:id";
}

pub mod appointments {
    pub const APPOINTMENTS: &str = "/api/appointments";
    pub const MY_APPOINTMENTS: &str = "/api/appointments/me";
    pub const APPOINTMENT_BY_ID: &str = "/api/appointments/:id";
    pub const APPOINTMENT_STATUS: &str = "/api/appointments/:id/status";
}
