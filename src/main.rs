use adw::prelude::*;
use adw::Application;
use gtk4::glib;

fn main() -> glib::ExitCode {
    booking_admin::utils::init_logging();

    let app = Application::builder()
        .application_id("com.example.BookingAdmin")
        .build();
    app.connect_activate(booking_admin::ui::build_ui);
    app.run()
}
