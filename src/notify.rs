use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// How long a banner stays up before it clears itself.
pub const DISMISS_AFTER: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BannerTarget {
    Login,
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    pub fn css_class(self) -> &'static str {
        match self {
            BannerKind::Success => "success",
            BannerKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub kind: BannerKind,
    generation: u64,
}

/// The visible message of every banner target. A target without an entry is
/// hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banners {
    visible: BTreeMap<BannerTarget, Banner>,
    next_generation: u64,
}

impl Banners {
    pub fn get(&self, target: BannerTarget) -> Option<&Banner> {
        self.visible.get(&target)
    }

    pub fn message(&self, target: BannerTarget) -> Option<&str> {
        self.get(target).map(|b| b.message.as_str())
    }

    /// Replaces whatever the target showed. Returns the generation a later
    /// `expire` must present to clear it.
    pub fn show(&mut self, target: BannerTarget, kind: BannerKind, message: impl Into<String>) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.visible.insert(
            target,
            Banner {
                message: message.into(),
                kind,
                generation,
            },
        );
        generation
    }

    /// Clears the target only if it still shows the message of `generation`.
    pub fn expire(&mut self, target: BannerTarget, generation: u64) -> bool {
        match self.visible.get(&target) {
            Some(banner) if banner.generation == generation => {
                self.visible.remove(&target);
                true
            }
            _ => false,
        }
    }
}

/// Publishes banners and dismisses each one after [`DISMISS_AFTER`]. Must be
/// used from within a tokio runtime.
#[derive(Clone)]
pub struct Notifier {
    tx: Arc<watch::Sender<Banners>>,
    delay: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_delay(DISMISS_AFTER)
    }

    pub fn with_delay(delay: Duration) -> Self {
        let (tx, _) = watch::channel(Banners::default());
        Self {
            tx: Arc::new(tx),
            delay,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Banners> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Banners {
        self.tx.borrow().clone()
    }

    pub fn success(&self, target: BannerTarget, message: impl Into<String>) {
        self.show(message, BannerKind::Success, target);
    }

    pub fn error(&self, target: BannerTarget, message: impl Into<String>) {
        self.show(message, BannerKind::Error, target);
    }

    pub fn show(&self, message: impl Into<String>, kind: BannerKind, target: BannerTarget) {
        let message = message.into();
        match kind {
            BannerKind::Success => log::info!("{:?}: {}", target, message),
            BannerKind::Error => log::warn!("{:?}: {}", target, message),
        }

        let mut generation = 0;
        self.tx.send_modify(|banners| generation = banners.show(target, kind, message));

        let tx = self.tx.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send_if_modified(|banners| banners.expire(target, generation));
        });
    }
}
