use crate::models::TimeSlot;

/// Ascending by start time. "HH:mm" is fixed-width, so string order is time order.
pub fn sort_slots(slots: &mut [TimeSlot]) {
    slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSlot {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSelection {
    selected: Option<SelectedSlot>,
}

impl SlotSelection {
    pub fn selected(&self) -> Option<&SelectedSlot> {
        self.selected.as_ref()
    }

    /// Selects the slot starting at `start_time`. Unknown or unavailable
    /// slots leave the selection untouched.
    pub fn select(&mut self, slots: &[TimeSlot], start_time: &str) -> bool {
        match slots
            .iter()
            .find(|slot| slot.start_time == start_time && slot.available)
        {
            Some(slot) => {
                self.selected = Some(SelectedSlot {
                    start_time: slot.start_time.clone(),
                    end_time: slot.end_time.clone(),
                });
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drops the selection if `slots` no longer offers it as available.
    pub fn revalidate(&mut self, slots: &[TimeSlot]) {
        let still_offered = self.selected.as_ref().is_some_and(|selected| {
            slots
                .iter()
                .any(|slot| slot.available && slot.start_time == selected.start_time)
        });
        if !still_offered {
            self.selected = None;
        }
    }
}
