use chrono::NaiveDate;

use crate::{
    booking::{
        calendar::{CalendarDay, MonthCursor},
        outcome::StageOutcome,
        slots::{SelectedSlot, SlotSelection, sort_slots},
    },
    client::ApiClient,
    dto::{booking::SlotQuery, cart::AddToCartRequest},
    error::{AppError, AppResult},
    models::{Employee, Language, TimeSlot},
    scope::ScreenScope,
    services::{booking_service, cart_service},
};

/// The (salon, service) pair being booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookingTarget {
    pub salon_id: i64,
    pub service_id: i64,
    pub is_sub_service: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Client-side state of the date → employee → slot → cart selection screen.
///
/// Every selection that depends on an upstream choice is cleared when that
/// choice changes, and fetch results for superseded queries are dropped.
/// Availability and conflicts are decided by the backend only.
#[derive(Debug, Clone)]
pub struct BookingFlow {
    target: BookingTarget,
    calendar: MonthCursor,
    selected_date: Option<NaiveDate>,
    employees: Loadable<Vec<Employee>>,
    selected_employee: Option<i64>,
    slots: Loadable<Vec<TimeSlot>>,
    slot_query: Option<SlotQuery>,
    selection: SlotSelection,
}

impl BookingFlow {
    pub fn new(target: BookingTarget, today: NaiveDate) -> Self {
        Self {
            target,
            calendar: MonthCursor::new(today),
            selected_date: None,
            employees: Loadable::Idle,
            selected_employee: None,
            slots: Loadable::Idle,
            slot_query: None,
            selection: SlotSelection::default(),
        }
    }

    pub fn target(&self) -> BookingTarget {
        self.target
    }

    pub fn calendar(&self) -> &MonthCursor {
        &self.calendar
    }

    pub fn next_month(&mut self) {
        self.calendar.next_month();
    }

    pub fn prev_month(&mut self) {
        self.calendar.prev_month();
    }

    pub fn days(&self, language: Language) -> Vec<CalendarDay> {
        self.calendar.days(language)
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_employee(&self) -> Option<i64> {
        self.selected_employee
    }

    pub fn employees(&self) -> &Loadable<Vec<Employee>> {
        &self.employees
    }

    pub fn slots(&self) -> &Loadable<Vec<TimeSlot>> {
        &self.slots
    }

    pub fn selected_slot(&self) -> Option<&SelectedSlot> {
        self.selection.selected()
    }

    pub fn current_query(&self) -> Option<&SlotQuery> {
        self.slot_query.as_ref()
    }

    pub fn select_date(&mut self, date: NaiveDate) -> AppResult<SlotQuery> {
        if date < self.calendar.today() {
            return Err(AppError::InvalidInput(format!("{date} is in the past")));
        }
        self.selected_date = Some(date);
        self.invalidate_slots()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("slot query without a date")))
    }

    /// `None` removes the employee filter.
    pub fn select_employee(&mut self, employee_id: Option<i64>) -> Option<SlotQuery> {
        if self.selected_employee == employee_id && self.slot_query.is_some() {
            return None;
        }
        self.selected_employee = employee_id;
        self.invalidate_slots()
    }

    /// Switches to another (salon, service) pair. The chosen day survives;
    /// employees, the employee filter and slots do not.
    pub fn retarget(&mut self, target: BookingTarget) -> Option<SlotQuery> {
        if self.target == target {
            return None;
        }
        self.target = target;
        self.employees = Loadable::Idle;
        self.selected_employee = None;
        self.invalidate_slots()
    }

    pub fn begin_employee_load(&mut self) {
        self.employees = Loadable::Loading;
    }

    /// Stores the employee fetch result. If the active filter names an
    /// employee that is no longer offered, the filter is dropped and the
    /// slot query to re-run is returned. A failure replaces the slot list
    /// with the error message.
    pub fn apply_employees(&mut self, result: AppResult<Vec<Employee>>) -> Option<SlotQuery> {
        match result {
            Ok(employees) => {
                let filter_gone = self
                    .selected_employee
                    .is_some_and(|id| !employees.iter().any(|e| e.id == id));
                self.employees = Loadable::Loaded(employees);
                if filter_gone {
                    self.selected_employee = None;
                    return self.invalidate_slots();
                }
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, salon_id = self.target.salon_id, "employee fetch failed");
                let message = err.user_message();
                self.selection.clear();
                self.slots = Loadable::Failed(message.clone());
                self.employees = Loadable::Failed(message);
                None
            }
        }
    }

    /// Stores a slot fetch result. Returns `false` when `query` has been
    /// superseded and the result was discarded.
    pub fn apply_slots(&mut self, query: &SlotQuery, result: AppResult<Vec<TimeSlot>>) -> bool {
        if self.slot_query.as_ref() != Some(query) {
            tracing::debug!(date = %query.date, "discarding stale slot result");
            return false;
        }
        match result {
            Ok(mut slots) => {
                sort_slots(&mut slots);
                self.selection.revalidate(&slots);
                self.slots = Loadable::Loaded(slots);
            }
            Err(err) => {
                tracing::warn!(error = %err, date = %query.date, "slot fetch failed");
                self.selection.clear();
                self.slots = Loadable::Failed(err.user_message());
            }
        }
        true
    }

    pub fn select_slot(&mut self, start_time: &str) -> bool {
        match &self.slots {
            Loadable::Loaded(slots) => self.selection.select(slots, start_time),
            _ => false,
        }
    }

    pub fn staging_request(&self) -> Option<AddToCartRequest> {
        let date = self.selected_date?;
        let slot = self.selection.selected()?;
        Some(AddToCartRequest {
            salon_id: self.target.salon_id,
            service_id: self.target.service_id,
            is_sub_service: self.target.is_sub_service,
            employee_id: self.selected_employee,
            date,
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
        })
    }

    /// Fetches employees for the current target. Fetch failures land in
    /// [`BookingFlow::employees`]; only cancellation is returned as an error.
    pub async fn load_employees(&mut self, client: &ApiClient, scope: &ScreenScope) -> AppResult<()> {
        self.begin_employee_load();
        let target = self.target;
        let result = scope
            .run(booking_service::available_employees(client, &target))
            .await;
        if matches!(result, Err(AppError::Cancelled)) {
            return Err(AppError::Cancelled);
        }
        if let Some(query) = self.apply_employees(result) {
            self.fetch_slots(client, scope, query).await?;
        }
        Ok(())
    }

    /// Re-runs the current slot query, if a day has been picked.
    pub async fn refresh_slots(&mut self, client: &ApiClient, scope: &ScreenScope) -> AppResult<()> {
        match self.slot_query.clone() {
            Some(query) => self.fetch_slots(client, scope, query).await,
            None => Ok(()),
        }
    }

    async fn fetch_slots(
        &mut self,
        client: &ApiClient,
        scope: &ScreenScope,
        query: SlotQuery,
    ) -> AppResult<()> {
        self.slots = Loadable::Loading;
        let result = scope
            .run(booking_service::available_times(client, &query))
            .await;
        if matches!(result, Err(AppError::Cancelled)) {
            return Err(AppError::Cancelled);
        }
        self.apply_slots(&query, result);
        Ok(())
    }

    /// Stages the current selection as a cart line. Selections are kept so
    /// the user can add more services afterwards.
    pub async fn stage(&self, client: &ApiClient, scope: &ScreenScope) -> AppResult<StageOutcome> {
        let request = self
            .staging_request()
            .ok_or_else(|| AppError::InvalidInput("select a day and a time first".into()))?;
        let result = scope.run(cart_service::add_to_cart(client, &request)).await;
        StageOutcome::from_result(result)
    }

    fn invalidate_slots(&mut self) -> Option<SlotQuery> {
        self.selection.clear();
        let query = self.selected_date.map(|date| SlotQuery {
            salon_id: self.target.salon_id,
            service_id: self.target.service_id,
            date,
            employee_id: self.selected_employee,
            is_sub_service: self.target.is_sub_service,
        });
        self.slots = if query.is_some() {
            Loadable::Loading
        } else {
            Loadable::Idle
        };
        self.slot_query = query.clone();
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> BookingTarget {
        BookingTarget {
            salon_id: 3,
            service_id: 12,
            is_sub_service: false,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn slot(start: &str, end: &str, available: bool) -> TimeSlot {
        TimeSlot {
            start_time: start.into(),
            end_time: end.into(),
            available,
        }
    }

    #[test]
    fn picking_a_day_builds_slot_query_without_employee() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        let query = flow.select_date(date(2025, 4, 15)).unwrap();

        assert_eq!(
            query,
            SlotQuery {
                salon_id: 3,
                service_id: 12,
                date: date(2025, 4, 15),
                employee_id: None,
                is_sub_service: false,
            }
        );
        assert_eq!(flow.slots(), &Loadable::Loading);
    }

    #[test]
    fn past_days_are_rejected() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        assert!(matches!(
            flow.select_date(date(2025, 4, 9)),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(flow.selected_date(), None);
    }

    #[test]
    fn slots_render_sorted_and_unavailable_taps_are_ignored() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        let query = flow.select_date(date(2025, 4, 15)).unwrap();
        assert!(flow.apply_slots(
            &query,
            Ok(vec![slot("14:00", "14:30", true), slot("09:00", "09:30", false)])
        ));

        let starts: Vec<_> = flow
            .slots()
            .loaded()
            .unwrap()
            .iter()
            .map(|s| (s.start_time.as_str(), s.available))
            .collect();
        assert_eq!(starts, vec![("09:00", false), ("14:00", true)]);

        assert!(!flow.select_slot("09:00"));
        assert_eq!(flow.selected_slot(), None);

        assert!(flow.select_slot("14:00"));
        let selected = flow.selected_slot().unwrap();
        assert_eq!(selected.start_time, "14:00");
        assert_eq!(selected.end_time, "14:30");
    }

    #[test]
    fn changing_day_clears_time_selection() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        let query = flow.select_date(date(2025, 4, 15)).unwrap();
        flow.apply_slots(&query, Ok(vec![slot("10:00", "10:30", true)]));
        assert!(flow.select_slot("10:00"));

        flow.select_date(date(2025, 4, 16)).unwrap();
        assert_eq!(flow.selected_slot(), None);
        assert!(flow.staging_request().is_none());
    }

    #[test]
    fn employee_change_requests_refetch_and_drops_stale_results() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        let first = flow.select_date(date(2025, 4, 15)).unwrap();
        let second = flow.select_employee(Some(8)).unwrap();
        assert_eq!(second.employee_id, Some(8));

        assert!(!flow.apply_slots(&first, Ok(vec![slot("10:00", "10:30", true)])));
        assert_eq!(flow.slots(), &Loadable::Loading);

        assert!(flow.apply_slots(&second, Ok(vec![slot("11:00", "11:30", true)])));
        assert_eq!(flow.slots().loaded().map(Vec::len), Some(1));
    }

    #[test]
    fn employee_filter_without_day_does_not_fetch() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        assert_eq!(flow.select_employee(Some(4)), None);
        assert_eq!(flow.slots(), &Loadable::Idle);
    }

    #[test]
    fn retarget_resets_employee_dependent_state() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        flow.apply_employees(Ok(vec![Employee {
            id: 8,
            name: "Lina".into(),
            image: None,
        }]));
        flow.select_date(date(2025, 4, 15)).unwrap();
        flow.select_employee(Some(8));

        let next = BookingTarget {
            service_id: 99,
            is_sub_service: true,
            ..target()
        };
        let query = flow.retarget(next).unwrap();
        assert_eq!(query.service_id, 99);
        assert!(query.is_sub_service);
        assert_eq!(query.employee_id, None);
        assert_eq!(flow.employees(), &Loadable::Idle);
        assert_eq!(flow.selected_date(), Some(date(2025, 4, 15)));
    }

    #[test]
    fn vanished_employee_filter_is_dropped() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        flow.select_date(date(2025, 4, 15)).unwrap();
        flow.select_employee(Some(8));

        let requery = flow.apply_employees(Ok(vec![Employee {
            id: 2,
            name: "Sara".into(),
            image: None,
        }]));
        assert_eq!(requery.map(|q| q.employee_id), Some(None));
        assert_eq!(flow.selected_employee(), None);
    }

    #[test]
    fn fetch_failure_surfaces_message_in_place_of_list() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        flow.apply_employees(Err(AppError::MissingToken));
        assert_eq!(flow.employees().error(), Some("Please sign in to continue"));
    }

    #[test]
    fn employee_failure_replaces_slot_list_and_selection() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        let query = flow.select_date(date(2025, 4, 15)).unwrap();
        flow.apply_slots(&query, Ok(vec![slot("14:00", "14:30", true)]));
        assert!(flow.select_slot("14:00"));

        flow.apply_employees(Err(AppError::MissingToken));
        assert_eq!(flow.slots().error(), Some("Please sign in to continue"));
        assert!(flow.selected_slot().is_none());
        assert!(flow.staging_request().is_none());
    }

    #[test]
    fn staging_request_reflects_selection() {
        let mut flow = BookingFlow::new(target(), date(2025, 4, 10));
        let query = flow.select_date(date(2025, 4, 15)).unwrap();
        flow.apply_slots(&query, Ok(vec![slot("14:00", "14:30", true)]));
        flow.select_slot("14:00");

        let request = flow.staging_request().unwrap();
        assert_eq!(request.salon_id, 3);
        assert_eq!(request.service_id, 12);
        assert_eq!(request.date, date(2025, 4, 15));
        assert_eq!(request.employee_id, None);
        assert_eq!(request.start_time, "14:00");
        assert_eq!(request.end_time, "14:30");
    }
}
