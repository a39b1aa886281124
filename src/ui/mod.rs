use gtk4 as gtk;
use gtk4::prelude::*;

use crate::notify::{BannerTarget, Banners};

pub mod booking_form;
pub mod bookings_table;
pub mod confirm;
pub mod login;
pub mod main_window;

pub fn build_ui(app: &adw::Application) {
    if let Some(window) = app.active_window() {
        window.present();
        return;
    }
    main_window::show_main_window(app);
}

pub(crate) fn banner_label() -> gtk::Label {
    let label = gtk::Label::new(None);
    label.set_halign(gtk::Align::Start);
    label.set_wrap(true);
    label.set_visible(false);
    label
}

pub(crate) fn apply_banner(label: &gtk::Label, banners: &Banners, target: BannerTarget) {
    label.remove_css_class("success");
    label.remove_css_class("error");
    match banners.get(target) {
        Some(banner) => {
            label.set_label(&banner.message);
            label.add_css_class(banner.kind.css_class());
            label.set_visible(true);
        }
        None => {
            label.set_label("");
            label.set_visible(false);
        }
    }
}
