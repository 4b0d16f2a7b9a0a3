use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salon_booking_client::{
    booking::{
        BookingFlow, BookingTarget, ModalOutcome, StageOutcome, calendar::MonthCursor,
    },
    config::AppConfig,
    dto::{
        appointments::{AppointmentQuery, ChangeTimeRequest},
        auth::{LoginRequest, RegisterRequest, ResendOtpRequest, UpdateProfileRequest, VerifyOtpRequest},
        booking::SlotQuery,
        cart::CheckoutRequest,
        params::Pagination,
    },
    error::{AppError, AppResult},
    models::{AppointmentStatus, Language},
    scope::ScreenScope,
    services::{
        appointment_service, auth_service, booking_service, cart_service, favorite_service,
        notification_service, profile_service, salon_service,
    },
    state::AppState,
};

/// Terminal front end for the salon booking service.
#[derive(Parser, Debug)]
#[command(name = "salon-client", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account; an OTP is sent to the phone.
    Register {
        name: String,
        phone: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Request an OTP for an existing account.
    Login { phone: String },
    /// Complete sign-in with the received OTP.
    Verify { phone: String, otp: String },
    ResendOtp { phone: String },
    Logout,
    DeleteAccount,
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Set the preferred language (en, ar).
    Language { language: Language },
    /// Home feed, optionally filtered by a search query.
    Home {
        #[arg(long)]
        search: Option<String>,
    },
    /// Salon detail and its service categories.
    Salon { id: i64 },
    /// Bookable days of the current month, or `next` months later.
    Days {
        #[arg(long, default_value_t = 0)]
        next: u32,
    },
    Employees {
        salon: i64,
        service: i64,
        #[arg(long)]
        sub: bool,
    },
    Slots {
        salon: i64,
        service: i64,
        date: NaiveDate,
        #[arg(long)]
        employee: Option<i64>,
        #[arg(long)]
        sub: bool,
    },
    /// Stage a slot in the cart.
    Book {
        salon: i64,
        service: i64,
        date: NaiveDate,
        time: String,
        #[arg(long)]
        employee: Option<i64>,
        #[arg(long)]
        sub: bool,
    },
    Cart,
    CartRemove { id: i64 },
    Checkout {
        #[arg(long, default_value = "cash")]
        payment_method: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Appointments {
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long)]
        status: Option<AppointmentStatus>,
    },
    Cancel { id: i64 },
    Reschedule {
        id: i64,
        date: NaiveDate,
        start: String,
        end: String,
        #[arg(long)]
        employee: Option<i64>,
    },
    Notifications {
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    MarkRead { ids: Vec<i64> },
    PushToken {
        token: String,
        #[arg(long, default_value = "android")]
        platform: String,
    },
    Favorites,
    FavoriteAdd { salon: i64 },
    FavoriteRemove { salon: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,salon_booking_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    let scope = ScreenScope::new();
    let closer = scope.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received Ctrl+C, abandoning request");
            closer.close();
        }
    });

    if let Err(err) = run(cli.command, &state, &scope).await {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("error: {}", err.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, state: &AppState, scope: &ScreenScope) -> AppResult<()> {
    let client = &state.client;
    let language = client.preferences().language()?;

    match command {
        Commands::Register { name, phone, email } => {
            let request = RegisterRequest { name, phone, email };
            scope.run(auth_service::register(client, &request)).await?;
            println!("OTP sent to {}", request.phone);
        }
        Commands::Login { phone } => {
            let request = LoginRequest { phone };
            scope.run(auth_service::login(client, &request)).await?;
            println!("OTP sent to {}", request.phone);
        }
        Commands::Verify { phone, otp } => {
            let request = VerifyOtpRequest {
                phone,
                otp,
                fcm_token: None,
            };
            let profile = scope.run(auth_service::verify_otp(client, request)).await?;
            match profile {
                Some(profile) => println!("Signed in as {}", profile.name),
                None => println!("Signed in"),
            }
        }
        Commands::ResendOtp { phone } => {
            let request = ResendOtpRequest { phone };
            scope.run(auth_service::resend_otp(client, &request)).await?;
            println!("OTP re-sent to {}", request.phone);
        }
        Commands::Logout => {
            auth_service::logout(client).await?;
            println!("Signed out");
        }
        Commands::DeleteAccount => {
            scope.run(auth_service::delete_account(client)).await?;
            println!("Account deleted");
        }
        Commands::Profile { name, email } => {
            let profile = if name.is_some() || email.is_some() {
                let request = UpdateProfileRequest { name, email };
                scope
                    .run(profile_service::update_profile(client, &request))
                    .await?
            } else {
                scope.run(profile_service::get_profile(client)).await?
            };
            println!(
                "{} | {} | {}",
                profile.name,
                profile.phone,
                profile.email.as_deref().unwrap_or("-")
            );
        }
        Commands::Language { language } => {
            client.preferences().set_language(language)?;
            println!("Language set to {language}");
        }
        Commands::Home { search } => {
            let query = search.unwrap_or_default();
            let salons = scope
                .run(salon_service::filter_home_salons(client, &query))
                .await?;
            for salon in salons {
                println!(
                    "#{} {} {}",
                    salon.id,
                    salon.name.get(language),
                    salon.address.as_deref().unwrap_or("")
                );
            }
        }
        Commands::Salon { id } => {
            let salon = scope
                .run(salon_service::salon_detail(client, &state.salons, id))
                .await?;
            println!("#{} {}", salon.id, salon.name.get(language));
            let categories = scope
                .run(salon_service::salon_categories(client, id))
                .await?;
            for category in categories {
                println!("  {}", category.name.get(language));
                for service in category.services {
                    println!(
                        "    #{} {} ({})",
                        service.id,
                        service.name.get(language),
                        service.price
                    );
                    for sub in service.sub_services {
                        println!("      #{} {} ({})", sub.id, sub.name.get(language), sub.price);
                    }
                }
            }
        }
        Commands::Days { next } => {
            let mut cursor = MonthCursor::new(Utc::now().date_naive());
            for _ in 0..next {
                cursor.next_month();
            }
            println!("{}", cursor.label());
            for day in cursor.days(language) {
                println!("  {:>2} {}", day.day, day.weekday);
            }
        }
        Commands::Employees { salon, service, sub } => {
            let target = BookingTarget {
                salon_id: salon,
                service_id: service,
                is_sub_service: sub,
            };
            let employees = scope
                .run(booking_service::available_employees(client, &target))
                .await?;
            for employee in employees {
                println!("#{} {}", employee.id, employee.name);
            }
        }
        Commands::Slots {
            salon,
            service,
            date,
            employee,
            sub,
        } => {
            let query = SlotQuery {
                salon_id: salon,
                service_id: service,
                date,
                employee_id: employee,
                is_sub_service: sub,
            };
            let slots = scope
                .run(booking_service::available_times(client, &query))
                .await?;
            for slot in slots {
                let marker = if slot.available { " " } else { "x" };
                println!("[{marker}] {}-{}", slot.start_time, slot.end_time);
            }
        }
        Commands::Book {
            salon,
            service,
            date,
            time,
            employee,
            sub,
        } => {
            let mut flow = BookingFlow::new(
                BookingTarget {
                    salon_id: salon,
                    service_id: service,
                    is_sub_service: sub,
                },
                Utc::now().date_naive(),
            );
            let query = flow.select_date(date)?;
            let query = flow.select_employee(employee).unwrap_or(query);
            let slots = scope
                .run(booking_service::available_times(client, &query))
                .await?;
            flow.apply_slots(&query, Ok(slots));
            if !flow.select_slot(&time) {
                return Err(AppError::InvalidInput(format!("{time} is not available")));
            }
            let outcome = flow.stage(client, scope).await?;
            match &outcome {
                StageOutcome::Added(item) => println!(
                    "Added #{} {} {}-{} ({})",
                    item.cart_item_id,
                    item.date,
                    item.start_time,
                    item.end_time,
                    item.price
                ),
                StageOutcome::Conflict { .. } => {
                    if let Some(modal) = ModalOutcome::staging(&outcome) {
                        println!("{}", modal.message());
                    }
                }
            }
        }
        Commands::Cart => {
            let cart = scope.run(cart_service::list_cart(client)).await?;
            for item in &cart.items {
                println!(
                    "#{} {} {} {}-{} {}",
                    item.cart_item_id,
                    item.service.get(language),
                    item.date,
                    item.start_time,
                    item.end_time,
                    item.price
                );
            }
            println!("Total: {}", cart.total_price);
        }
        Commands::CartRemove { id } => {
            scope.run(cart_service::remove_from_cart(client, id)).await?;
            println!("Removed #{id}");
        }
        Commands::Checkout {
            payment_method,
            notes,
        } => {
            let request = CheckoutRequest {
                payment_method,
                notes,
            };
            let result = scope.run(cart_service::checkout(client, &request)).await;
            report(result, ModalOutcome::checkout)?;
        }
        Commands::Appointments { page, status } => {
            let query = AppointmentQuery {
                pagination: Pagination::page(page),
                status,
            };
            let appointments = scope
                .run(appointment_service::list_appointments(client, query))
                .await?;
            for appointment in &appointments.items {
                let actions = appointment.actions();
                println!(
                    "#{} [{}] {} {} {} {}{}",
                    appointment.id,
                    appointment.status.as_str(),
                    appointment.date,
                    appointment.start_time,
                    appointment.salon.get(language),
                    appointment.service.get(language),
                    if actions.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", actions.join(", "))
                    }
                );
            }
            if appointments.has_more() {
                println!("(more on page {})", page + 1);
            }
        }
        Commands::Cancel { id } => {
            let appointment = scope
                .run(appointment_service::find_appointment(client, id))
                .await?;
            let result = scope
                .run(appointment_service::cancel_appointment(client, &appointment))
                .await;
            report(result, |result| ModalOutcome::cancellation(id, result))?;
        }
        Commands::Reschedule {
            id,
            date,
            start,
            end,
            employee,
        } => {
            let request = ChangeTimeRequest {
                date,
                start_time: start,
                end_time: end,
                employee_id: employee,
            };
            let appointment = scope
                .run(appointment_service::find_appointment(client, id))
                .await?;
            let result = scope
                .run(appointment_service::change_time(client, &appointment, &request))
                .await;
            report(result, ModalOutcome::reschedule)?;
        }
        Commands::Notifications { page } => {
            let notifications = scope
                .run(notification_service::list_notifications(
                    client,
                    Pagination::page(page),
                ))
                .await?;
            for notification in &notifications.items {
                let marker = if notification.is_read { " " } else { "*" };
                println!(
                    "{marker} #{} {}: {}",
                    notification.id,
                    notification.title.get(language),
                    notification.body.get(language)
                );
            }
        }
        Commands::MarkRead { ids } => {
            scope
                .run(notification_service::mark_read(client, ids))
                .await?;
            println!("Marked as read");
        }
        Commands::PushToken { token, platform } => {
            let sent = scope
                .run(notification_service::register_push_token(
                    client, &token, &platform,
                ))
                .await?;
            println!("Push token stored{}", if sent { " and registered" } else { "" });
        }
        Commands::Favorites => {
            let favorites = scope
                .run(favorite_service::list_favorites(client, Pagination::page(1)))
                .await?;
            for favorite in &favorites.items {
                println!("#{} {}", favorite.salon_id, favorite.name.get(language));
            }
        }
        Commands::FavoriteAdd { salon } => {
            scope
                .run(favorite_service::add_favorite(client, salon))
                .await?;
            println!("Added salon #{salon} to favorites");
        }
        Commands::FavoriteRemove { salon } => {
            scope
                .run(favorite_service::remove_favorite(client, salon))
                .await?;
            println!("Removed salon #{salon} from favorites");
        }
    }

    Ok(())
}

/// Prints the confirmation modal on success. Failures keep their original
/// error so the exit path reports them as they are.
fn report<T>(result: AppResult<T>, modal: impl FnOnce(AppResult<T>) -> ModalOutcome) -> AppResult<()> {
    let value = result?;
    println!("{}", modal(Ok(value)).message());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_takes_months_ahead_via_next() {
        let cli = Cli::try_parse_from(["salon-client", "days", "--next", "2"]).unwrap();
        assert!(matches!(cli.command, Commands::Days { next: 2 }));
    }

    #[test]
    fn failed_modal_keeps_server_error() {
        let server_error = AppError::from_response(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message":"Checkout is down"}"#,
        );
        let err = report(Err::<(), _>(server_error), |_| ModalOutcome::Failed {
            message: String::new(),
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Api { .. }));
        assert_eq!(err.user_message(), "Checkout is down");
    }
}
