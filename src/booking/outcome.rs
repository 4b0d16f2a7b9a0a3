use serde::Serialize;

use crate::{
    dto::cart::CheckoutResponse,
    error::{AppError, AppResult},
    models::{Appointment, CartItem},
};

/// Conflict reasons the backend reports with a stable `code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartConflict {
    /// The cart already holds services from another salon.
    CrossSalon,
    /// The slot overlaps an entry already in the cart.
    Overlap,
    SalonClosed,
}

impl CartConflict {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "cart_salon_conflict" => Some(CartConflict::CrossSalon),
            "cart_time_overlap" => Some(CartConflict::Overlap),
            "salon_closed" => Some(CartConflict::SalonClosed),
            _ => None,
        }
    }

    pub fn from_error(err: &AppError) -> Option<Self> {
        err.code().and_then(Self::from_code)
    }

    pub fn code(&self) -> &'static str {
        match self {
            CartConflict::CrossSalon => "cart_salon_conflict",
            CartConflict::Overlap => "cart_time_overlap",
            CartConflict::SalonClosed => "salon_closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Added(CartItem),
    Conflict {
        conflict: CartConflict,
        message: String,
    },
}

impl StageOutcome {
    /// Known conflicts become an outcome; every other failure propagates.
    pub fn from_result(result: AppResult<CartItem>) -> AppResult<Self> {
        match result {
            Ok(item) => Ok(StageOutcome::Added(item)),
            Err(err) => match CartConflict::from_error(&err) {
                Some(conflict) => Ok(StageOutcome::Conflict {
                    conflict,
                    message: err.user_message(),
                }),
                None => Err(err),
            },
        }
    }
}

/// What a confirm/done modal should show after an action settles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModalOutcome {
    CheckoutConfirmed { appointment_ids: Vec<i64> },
    AppointmentCancelled { id: i64 },
    AppointmentRescheduled { id: i64 },
    CartConflict { conflict: CartConflict, message: String },
    Failed { message: String },
}

impl ModalOutcome {
    pub fn checkout(result: AppResult<CheckoutResponse>) -> Self {
        match result {
            Ok(response) => ModalOutcome::CheckoutConfirmed {
                appointment_ids: response.appointment_ids,
            },
            Err(err) => Self::failure(err),
        }
    }

    pub fn cancellation(id: i64, result: AppResult<()>) -> Self {
        match result {
            Ok(()) => ModalOutcome::AppointmentCancelled { id },
            Err(err) => Self::failure(err),
        }
    }

    pub fn reschedule(result: AppResult<Appointment>) -> Self {
        match result {
            Ok(appointment) => ModalOutcome::AppointmentRescheduled { id: appointment.id },
            Err(err) => Self::failure(err),
        }
    }

    pub fn staging(outcome: &StageOutcome) -> Option<Self> {
        match outcome {
            StageOutcome::Added(_) => None,
            StageOutcome::Conflict { conflict, message } => Some(ModalOutcome::CartConflict {
                conflict: *conflict,
                message: message.clone(),
            }),
        }
    }

    fn failure(err: AppError) -> Self {
        match CartConflict::from_error(&err) {
            Some(conflict) => ModalOutcome::CartConflict {
                conflict,
                message: err.user_message(),
            },
            None => ModalOutcome::Failed {
                message: err.user_message(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ModalOutcome::CheckoutConfirmed { .. }
                | ModalOutcome::AppointmentCancelled { .. }
                | ModalOutcome::AppointmentRescheduled { .. }
        )
    }

    pub fn message(&self) -> String {
        match self {
            ModalOutcome::CheckoutConfirmed { appointment_ids } => {
                format!("Booking confirmed ({} appointment(s))", appointment_ids.len())
            }
            ModalOutcome::AppointmentCancelled { .. } => "Appointment cancelled".to_string(),
            ModalOutcome::AppointmentRescheduled { .. } => "Appointment rescheduled".to_string(),
            ModalOutcome::CartConflict { message, .. } | ModalOutcome::Failed { message } => {
                message.clone()
            }
        }
    }
}
