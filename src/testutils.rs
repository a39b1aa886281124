use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{ApiError, Booking, BookingApi, BookingDraft, Credentials};
use crate::dashboard::Confirm;

pub const MOCK_USERNAME: &str = "admin";
pub const MOCK_PASSWORD: &str = "secret";
pub const MOCK_TOKEN: &str = "mock-token";

/// A canned HTTP failure for the next mutating call or single-record fetch.
#[derive(Debug, Clone)]
pub struct MockFailure {
    pub status: u16,
    pub message: Option<String>,
}

pub struct MockBookingApiInner {
    pub calls_to_login: AtomicU64,
    pub calls_to_admin_bookings: AtomicU64,
    pub calls_to_public_bookings: AtomicU64,
    pub calls_to_booking: AtomicU64,
    pub calls_to_create_booking: AtomicU64,
    pub calls_to_request_booking: AtomicU64,
    pub calls_to_update_booking: AtomicU64,
    pub calls_to_delete_booking: AtomicU64,
    pub list_fails: AtomicBool,
    pub failure: Mutex<Option<MockFailure>>,
    pub bookings: Mutex<Vec<Booking>>,
    pub updates: Mutex<Vec<(String, BookingDraft)>>,
    next_id: AtomicU64,
}

#[derive(Clone)]
pub struct MockBookingApi(pub Arc<MockBookingApiInner>);

impl MockBookingApiInner {
    fn new() -> Self {
        Self {
            calls_to_login: AtomicU64::default(),
            calls_to_admin_bookings: AtomicU64::default(),
            calls_to_public_bookings: AtomicU64::default(),
            calls_to_booking: AtomicU64::default(),
            calls_to_create_booking: AtomicU64::default(),
            calls_to_request_booking: AtomicU64::default(),
            calls_to_update_booking: AtomicU64::default(),
            calls_to_delete_booking: AtomicU64::default(),
            list_fails: AtomicBool::new(false),
            failure: Mutex::default(),
            bookings: Mutex::default(),
            updates: Mutex::default(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl MockBookingApi {
    pub fn new() -> Self {
        Self(Arc::new(MockBookingApiInner::new()))
    }

    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        let api = Self::new();
        *api.0.bookings.lock().unwrap() = bookings;
        api
    }

    pub fn fail_with(&self, status: u16, message: Option<&str>) {
        *self.0.failure.lock().unwrap() = Some(MockFailure {
            status,
            message: message.map(str::to_string),
        });
    }

    pub fn count(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> u64 {
        Self::count(&self.0.calls_to_admin_bookings)
    }

    pub fn total_calls(&self) -> u64 {
        let inner = &self.0;
        [
            &inner.calls_to_login,
            &inner.calls_to_admin_bookings,
            &inner.calls_to_public_bookings,
            &inner.calls_to_booking,
            &inner.calls_to_create_booking,
            &inner.calls_to_request_booking,
            &inner.calls_to_update_booking,
            &inner.calls_to_delete_booking,
        ]
        .iter()
        .map(|c| Self::count(c))
        .sum()
    }

    fn result(&self) -> Result<(), ApiError> {
        match self.0.failure.lock().unwrap().clone() {
            None => Ok(()),
            Some(MockFailure { status, message }) => Err(ApiError::RequestFailed { status, message }),
        }
    }

    fn check_token(token: &str) -> Result<(), ApiError> {
        match token == MOCK_TOKEN {
            true => Ok(()),
            false => Err(ApiError::RequestFailed {
                status: 401,
                message: Some("Unauthorized".into()),
            }),
        }
    }

    fn insert(&self, draft: &BookingDraft) {
        let id = self.0.next_id.fetch_add(1, Ordering::SeqCst);
        let booking = sample_booking(&format!("mock-{id}"), &draft.name);
        self.0.bookings.lock().unwrap().push(Booking {
            service: draft.service.clone(),
            time: draft.time.clone(),
            email: draft.email.clone(),
            ..booking
        });
    }
}

#[async_trait]
impl BookingApi for MockBookingApi {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        self.0.calls_to_login.fetch_add(1, Ordering::SeqCst);
        if credentials.username == MOCK_USERNAME && credentials.password == MOCK_PASSWORD {
            Ok(MOCK_TOKEN.into())
        } else {
            Err(ApiError::RequestFailed {
                status: 401,
                message: Some("Invalid username or password".into()),
            })
        }
    }

    async fn admin_bookings(&self, token: &str) -> Result<Vec<Booking>, ApiError> {
        self.0.calls_to_admin_bookings.fetch_add(1, Ordering::SeqCst);
        Self::check_token(token)?;
        if self.0.list_fails.load(Ordering::SeqCst) {
            return Err(ApiError::RequestFailed {
                status: 500,
                message: None,
            });
        }
        Ok(self.0.bookings.lock().unwrap().clone())
    }

    async fn public_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.0.calls_to_public_bookings.fetch_add(1, Ordering::SeqCst);
        if self.0.list_fails.load(Ordering::SeqCst) {
            return Err(ApiError::RequestFailed {
                status: 500,
                message: None,
            });
        }
        let bookings = self.0.bookings.lock().unwrap().clone();
        Ok(bookings.into_iter().map(|b| Booking { id: None, ..b }).collect())
    }

    async fn booking(&self, token: &str, id: &str) -> Result<Booking, ApiError> {
        self.0.calls_to_booking.fetch_add(1, Ordering::SeqCst);
        Self::check_token(token)?;
        self.result()?;
        self.0
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                id: id.to_string(),
                message: Some("Booking not found".into()),
            })
    }

    async fn create_booking(&self, token: &str, draft: &BookingDraft) -> Result<(), ApiError> {
        self.0.calls_to_create_booking.fetch_add(1, Ordering::SeqCst);
        Self::check_token(token)?;
        self.result()?;
        self.insert(draft);
        Ok(())
    }

    async fn request_booking(&self, draft: &BookingDraft) -> Result<(), ApiError> {
        self.0.calls_to_request_booking.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.insert(draft);
        Ok(())
    }

    async fn update_booking(&self, token: &str, id: &str, draft: &BookingDraft) -> Result<(), ApiError> {
        self.0.calls_to_update_booking.fetch_add(1, Ordering::SeqCst);
        Self::check_token(token)?;
        self.result()?;
        self.0.updates.lock().unwrap().push((id.to_string(), draft.clone()));
        Ok(())
    }

    async fn delete_booking(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.0.calls_to_delete_booking.fetch_add(1, Ordering::SeqCst);
        Self::check_token(token)?;
        self.result()?;
        let mut bookings = self.0.bookings.lock().unwrap();
        let before = bookings.len();
        bookings.retain(|b| b.id.as_deref() != Some(id));
        match bookings.len() < before {
            true => Ok(()),
            false => Err(ApiError::RequestFailed {
                status: 404,
                message: None,
            }),
        }
    }
}

/// Answers every confirmation prompt the same way and counts the prompts.
#[derive(Clone, Default)]
pub struct ScriptedConfirm {
    pub answer: Arc<AtomicBool>,
    pub prompts: Arc<AtomicU64>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Arc::new(AtomicBool::new(answer)),
            prompts: Arc::default(),
        }
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.answer.load(Ordering::SeqCst)
    }
}

pub fn sample_booking(id: &str, name: &str) -> Booking {
    Booking {
        id: Some(id.to_string()),
        service: "Haircut".into(),
        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().into(),
        time: "10:00".into(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}
