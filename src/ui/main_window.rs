use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use gtk4::glib;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::api::ApiClient;
use crate::app::{Settings, DEFAULT_API_URL};
use crate::dashboard::{Command, Dashboard, Screen};
use crate::notify::{BannerTarget, Banners, Notifier};
use crate::public::PublicBoard;
use crate::session::Session;
use crate::storage::TokenStore;
use crate::ui::booking_form::BookingForm;
use crate::ui::bookings_table::BookingsTable;
use crate::ui::confirm::DialogConfirm;
use crate::ui::login::LoginPage;
use crate::view::{ListScope, Placeholder, TableBody};

/// Everything the screen snapshot drives.
struct DashboardView {
    stack: gtk::Stack,
    logout_btn: gtk::Button,
    refresh_btn: gtk::Button,
    public_btn: gtk::Button,
    login: LoginPage,
    table: BookingsTable,
    create_form: BookingForm,
    create_banner: gtk::Label,
    edit_revealer: gtk::Revealer,
    edit_form: BookingForm,
    edit_banner: gtk::Label,
    public_table: BookingsTable,
    public_board: Arc<Mutex<PublicBoard<ApiClient>>>,
    /// Signed out and looking at the public listing instead of the login page.
    browsing: Cell<bool>,
}

impl DashboardView {
    fn apply_screen(&self, screen: &Screen) {
        if screen.signed_in {
            self.browsing.set(false);
        }
        let page = match (screen.signed_in, self.browsing.get()) {
            (true, _) => "dashboard",
            (false, true) => "public",
            (false, false) => "login",
        };
        self.stack.set_visible_child_name(page);
        self.logout_btn.set_visible(screen.signed_in);
        self.refresh_btn.set_visible(screen.signed_in);
        self.public_btn.set_visible(!screen.signed_in);
        self.login.sync(screen.login_epoch);
        self.table.set_body(&screen.table);
        self.create_form.sync(&screen.create);
        self.edit_form.sync(&screen.edit.form);
        self.edit_revealer.set_reveal_child(screen.edit.visible);
    }

    fn apply_banners(&self, banners: &Banners) {
        self.login.apply_banners(banners);
        super::apply_banner(&self.create_banner, banners, BannerTarget::Create);
        super::apply_banner(&self.edit_banner, banners, BannerTarget::Edit);
    }

    /// Switches to the public listing and reloads it off the main thread.
    fn show_public(self: &Rc<Self>) {
        self.browsing.set(true);
        self.stack.set_visible_child_name("public");
        self.public_table
            .set_body(&TableBody::Placeholder(Placeholder::Loading));

        let board = self.public_board.clone();
        let (tx, rx) = oneshot::channel();
        crate::utils::spawn_async(async move {
            let mut board = board.lock().await;
            board.refresh().await;
            let _ = tx.send(board.table());
        });

        let view = self.clone();
        glib::MainContext::default().spawn_local(async move {
            if let Ok(body) = rx.await {
                view.public_table.set_body(&body);
            }
        });
    }

    fn hide_public(&self) {
        self.browsing.set(false);
        self.stack.set_visible_child_name("login");
    }
}

fn section_title(text: &str) -> gtk::Label {
    let title = gtk::Label::new(Some(text));
    title.add_css_class("title-4");
    title.set_halign(gtk::Align::Start);
    title
}

fn connect_command(button: &gtk::Button, action: Rc<dyn Fn()>) {
    button.connect_clicked(move |_| (action)());
}

pub fn show_main_window(app: &Application) {
    let settings = Settings::load();
    let client = ApiClient::new(&settings.api_url, settings.login_url.as_deref()).or_else(|e| {
        log::error!("{}; falling back to {}", e, DEFAULT_API_URL);
        ApiClient::new(DEFAULT_API_URL, None)
    });
    let client = match client {
        Ok(client) => client,
        Err(e) => {
            log::error!("cannot start: {}", e);
            return;
        }
    };
    log::info!("using bookings API at {}", client.base_url());

    let session = TokenStore::default_location()
        .map(Session::restore)
        .unwrap_or_else(Session::ephemeral);
    let public_board = Arc::new(Mutex::new(PublicBoard::new(client.clone(), Notifier::new())));
    let dashboard = Dashboard::new(client, session, DialogConfirm);
    let mut screen_rx = dashboard.subscribe();
    let mut banners_rx = dashboard.banners();
    let (commands, commands_rx) = mpsc::unbounded_channel::<Command>();
    crate::utils::spawn_async(dashboard.run(commands_rx));

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Booking Admin")
        .default_width(1080)
        .default_height(720)
        .build();

    // Header with session controls
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk::Label::new(Some("Booking Admin"));
    header.set_title_widget(Some(&title));
    let logout_btn = gtk::Button::with_label("Log out");
    let refresh_btn = gtk::Button::from_icon_name("view-refresh-symbolic");
    refresh_btn.set_tooltip_text(Some("Reload bookings"));
    let public_btn = gtk::Button::with_label("Public listing");
    public_btn.set_tooltip_text(Some("Browse bookings without signing in"));
    header.pack_end(&logout_btn);
    header.pack_start(&refresh_btn);
    header.pack_start(&public_btn);
    container.append(&header);

    let login = LoginPage::new(commands.clone());
    let table = BookingsTable::new(commands.clone(), ListScope::Admin);

    // Dashboard page
    let page = gtk::Box::new(gtk::Orientation::Vertical, 12);
    page.set_margin_top(16);
    page.set_margin_bottom(16);
    page.set_margin_start(16);
    page.set_margin_end(16);
    page.append(&table.widget());

    let edit_banner = super::banner_label();
    page.append(&edit_banner);

    let edit_form = BookingForm::new();
    let edit_box = gtk::Box::new(gtk::Orientation::Vertical, 8);
    edit_box.append(&section_title("Edit booking"));
    edit_box.append(&edit_form.widget());
    let edit_actions = gtk::Box::new(gtk::Orientation::Horizontal, 6);
    edit_actions.set_halign(gtk::Align::End);
    let cancel_btn = gtk::Button::with_label("Cancel");
    let save_btn = gtk::Button::with_label("Save changes");
    save_btn.add_css_class("suggested-action");
    edit_actions.append(&cancel_btn);
    edit_actions.append(&save_btn);
    edit_box.append(&edit_actions);
    let edit_revealer = gtk::Revealer::builder()
        .transition_type(gtk::RevealerTransitionType::SlideDown)
        .child(&edit_box)
        .build();
    page.append(&edit_revealer);

    let create_form = BookingForm::new();
    page.append(&section_title("Create booking"));
    page.append(&create_form.widget());
    let create_banner = super::banner_label();
    page.append(&create_banner);
    let create_btn = gtk::Button::with_label("Create booking");
    create_btn.add_css_class("suggested-action");
    create_btn.set_halign(gtk::Align::End);
    page.append(&create_btn);

    let scroller = gtk::ScrolledWindow::builder()
        .vexpand(true)
        .hexpand(true)
        .child(&page)
        .build();

    // Public page, read-only
    let public_table = BookingsTable::new(commands.clone(), ListScope::Public);
    let public_page = gtk::Box::new(gtk::Orientation::Vertical, 12);
    public_page.set_margin_top(16);
    public_page.set_margin_bottom(16);
    public_page.set_margin_start(16);
    public_page.set_margin_end(16);
    public_page.append(&public_table.widget());
    let back_btn = gtk::Button::with_label("Back to login");
    back_btn.set_halign(gtk::Align::End);
    public_page.append(&back_btn);

    let stack = gtk::Stack::new();
    stack.set_transition_type(gtk::StackTransitionType::Crossfade);
    stack.add_named(&login.widget(), Some("login"));
    stack.add_named(&scroller, Some("dashboard"));
    stack.add_named(&public_page, Some("public"));
    container.append(&stack);
    window.set_content(Some(&container));

    // Each submit handler is connected exactly once; the dashboard knows
    // which booking the edit form belongs to.
    let on_create: Rc<dyn Fn()> = {
        let commands = commands.clone();
        let form = create_form.clone();
        Rc::new(move || {
            let _ = commands.send(Command::Create(form.values()));
        })
    };
    create_form.connect_submit(on_create.clone());
    connect_command(&create_btn, on_create);

    let on_save: Rc<dyn Fn()> = {
        let commands = commands.clone();
        let form = edit_form.clone();
        Rc::new(move || {
            let _ = commands.send(Command::SubmitEdit(form.values()));
        })
    };
    edit_form.connect_submit(on_save.clone());
    connect_command(&save_btn, on_save);

    for (button, command) in [
        (&cancel_btn, Command::CancelEdit),
        (&logout_btn, Command::Logout),
        (&refresh_btn, Command::Refresh),
    ] {
        let commands = commands.clone();
        connect_command(button, Rc::new(move || {
            let _ = commands.send(command.clone());
        }));
    }

    let view = Rc::new(DashboardView {
        stack,
        logout_btn,
        refresh_btn,
        public_btn,
        login,
        table,
        create_form,
        create_banner,
        edit_revealer,
        edit_form,
        edit_banner,
        public_table,
        public_board,
        browsing: Cell::new(false),
    });
    {
        let view_ref = view.clone();
        view.public_btn.connect_clicked(move |_| view_ref.show_public());
    }
    {
        let view_ref = view.clone();
        back_btn.connect_clicked(move |_| view_ref.hide_public());
    }
    let initial = screen_rx.borrow_and_update().clone();
    view.apply_screen(&initial);

    let ctx = glib::MainContext::default();
    {
        let view = view.clone();
        ctx.spawn_local(async move {
            while screen_rx.changed().await.is_ok() {
                let screen = screen_rx.borrow_and_update().clone();
                view.apply_screen(&screen);
            }
        });
    }
    ctx.spawn_local(async move {
        while banners_rx.changed().await.is_ok() {
            let banners = banners_rx.borrow_and_update().clone();
            view.apply_banners(&banners);
        }
    });

    window.present();
}
