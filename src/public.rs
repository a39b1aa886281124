use crate::api::{ApiError, BookingApi, BookingDraft};
use crate::notify::{BannerTarget, Notifier};
use crate::view::{render, ListScope, ListState, TableBody};

/// The unauthenticated side of the bookings API: a read-only list without
/// identifiers and a form for requesting a booking.
pub struct PublicBoard<A> {
    api: A,
    list: ListState,
    form: BookingDraft,
    notifier: Notifier,
}

impl<A: BookingApi> PublicBoard<A> {
    pub fn new(api: A, notifier: Notifier) -> Self {
        Self {
            api,
            list: ListState::Loading,
            form: BookingDraft::default(),
            notifier,
        }
    }

    pub fn table(&self) -> TableBody {
        render(&self.list, ListScope::Public)
    }

    pub fn form(&self) -> &BookingDraft {
        &self.form
    }

    pub async fn refresh(&mut self) {
        self.list = ListState::Loading;
        self.list = match self.api.public_bookings().await {
            Ok(bookings) => ListState::Loaded(bookings),
            Err(e) => {
                log::warn!("failed to load public bookings: {}", e);
                ListState::Failed
            }
        };
    }

    pub async fn request(&mut self, draft: BookingDraft) {
        self.form = draft.clone();
        let result = match draft.validate() {
            Ok(()) => self.api.request_booking(&draft).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                self.notifier.success(BannerTarget::Create, "Booking request submitted!");
                self.form = BookingDraft::default();
                self.refresh().await;
            }
            Err(ApiError::Validation(message)) => self.notifier.error(BannerTarget::Create, message),
            Err(e) if e.is_transport() => self.notifier.error(
                BannerTarget::Create,
                "Error submitting booking request. Please check your network.",
            ),
            Err(e) => self.notifier.error(
                BannerTarget::Create,
                e.server_message().unwrap_or("Failed to submit booking request."),
            ),
        }
    }
}
