use std::sync::Arc;

use chrono::{Datelike, Local};
use gestao_core::{
    billing::MonthlySnapshot, model::ServiceRecord, schedule::BinEvent, service::GestaoService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Calendar,
    Services,
}

impl Screen {
    pub(crate) fn next(self) -> Self {
        match self {
            Self::Dashboard => Self::Calendar,
            Self::Calendar => Self::Services,
            Self::Services => Self::Dashboard,
        }
    }
}

pub(crate) struct App {
    pub service: Arc<GestaoService>,

    pub screen: Screen,
    pub snapshot: Option<MonthlySnapshot>,
    pub events: Vec<BinEvent>,
    pub services: Vec<ServiceRecord>,

    pub selected_day: u8,
    pub service_index: usize,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<GestaoService>) -> Self {
        let today = Local::now().date_naive();
        let selected_day = u8::try_from(today.weekday().num_days_from_sunday()).unwrap_or(0);
        Self {
            service,
            screen: Screen::Dashboard,
            snapshot: None,
            events: Vec::new(),
            services: Vec::new(),
            selected_day,
            service_index: 0,
            is_loading: false,
            error_message: None,
        }
    }

    /// Reference month and year for the financial snapshot, taken from the
    /// wall clock here so the core computation stays parameterized.
    pub(crate) fn reference_month() -> (u32, i32) {
        let now = Local::now();
        (now.month(), now.year())
    }

    pub(crate) fn events_for_day(&self, day: u8) -> Vec<&BinEvent> {
        let mut events: Vec<&BinEvent> = self
            .events
            .iter()
            .filter(|event| event.day == day)
            .collect();
        events.sort_by_key(|event| event.time);
        events
    }

    pub(crate) fn previous_day(&mut self) {
        self.selected_day = (self.selected_day + 6) % 7;
    }

    pub(crate) fn next_day(&mut self) {
        self.selected_day = (self.selected_day + 1) % 7;
    }
}
