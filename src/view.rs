use crate::api::Booking;

pub const TABLE_DATE_FORMAT: &str = "%-d %b %Y";

/// What the list last heard from the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    SignedOut,
    Loading,
    Loaded(Vec<Booking>),
    Failed,
}

/// Admin rows carry identifiers and actions, public rows do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Admin,
    Public,
}

impl ListScope {
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            ListScope::Admin => &["ID", "Service", "Date", "Time", "Name", "Email", "Actions"],
            ListScope::Public => &["Service", "Date", "Time", "Name", "Email"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    SignedOut,
    Loading,
    Empty,
    Failed,
}

impl Placeholder {
    pub fn text(self) -> &'static str {
        match self {
            Placeholder::SignedOut => "Please log in to view bookings.",
            Placeholder::Loading => "Loading bookings...",
            Placeholder::Empty => "No bookings found.",
            Placeholder::Failed => "Failed to load bookings. Please check your network and backend.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRow {
    pub scope: ListScope,
    /// The Edit and Delete actions act on it. Admin records without one are
    /// listed but get no actions.
    pub id: Option<String>,
    pub service: String,
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: String,
}

impl BookingRow {
    pub fn has_actions(&self) -> bool {
        self.id.is_some()
    }

    /// Text cells in column order, without the actions column.
    pub fn cells(&self) -> Vec<&str> {
        let mut cells = Vec::with_capacity(6);
        if self.scope == ListScope::Admin {
            cells.push(self.id.as_deref().unwrap_or_default());
        }
        cells.extend([
            self.service.as_str(),
            self.date.as_str(),
            self.time.as_str(),
            self.name.as_str(),
            self.email.as_str(),
        ]);
        cells
    }
}

/// Either a single placeholder row or one row per booking, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Placeholder(Placeholder),
    Rows(Vec<BookingRow>),
}

impl TableBody {
    pub fn row_count(&self) -> usize {
        match self {
            TableBody::Placeholder(_) => 1,
            TableBody::Rows(rows) => rows.len(),
        }
    }
}

pub fn render(state: &ListState, scope: ListScope) -> TableBody {
    match state {
        ListState::SignedOut => TableBody::Placeholder(Placeholder::SignedOut),
        ListState::Loading => TableBody::Placeholder(Placeholder::Loading),
        ListState::Failed => TableBody::Placeholder(Placeholder::Failed),
        ListState::Loaded(bookings) if bookings.is_empty() => TableBody::Placeholder(Placeholder::Empty),
        ListState::Loaded(bookings) => TableBody::Rows(bookings.iter().map(|b| row(b, scope)).collect()),
    }
}

fn row(booking: &Booking, scope: ListScope) -> BookingRow {
    let id = match scope {
        ListScope::Admin => {
            if booking.id.is_none() {
                log::warn!("booking for {:?} has no id, listing it without actions", booking.name);
            }
            booking.id.clone()
        }
        ListScope::Public => None,
    };
    BookingRow {
        scope,
        id,
        service: booking.service.clone(),
        date: booking.date.display(TABLE_DATE_FORMAT),
        time: booking.time.clone(),
        name: booking.name.clone(),
        email: booking.email.clone(),
    }
}
