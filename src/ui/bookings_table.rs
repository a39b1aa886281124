use gtk4 as gtk;
use gtk4::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use crate::dashboard::Command;
use crate::view::{ListScope, TableBody};

pub struct BookingsTable {
    root: gtk::Box,
    grid: gtk::Grid,
    scope: ListScope,
    commands: UnboundedSender<Command>,
}

impl BookingsTable {
    /// Public tables never render action buttons, so `commands` stays unused there.
    pub fn new(commands: UnboundedSender<Command>, scope: ListScope) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);

        let title = gtk::Label::new(Some("Bookings"));
        title.add_css_class("title-4");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let grid = gtk::Grid::builder()
            .column_spacing(12)
            .row_spacing(6)
            .build();
        let scroller = gtk::ScrolledWindow::builder()
            .hexpand(true)
            .min_content_height(240)
            .child(&grid)
            .build();
        root.append(&scroller);

        Self {
            root,
            grid,
            scope,
            commands,
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    fn cell(&self, text: &str, column: usize, row: i32) -> gtk::Label {
        let label = gtk::Label::new(Some(text));
        label.set_halign(gtk::Align::Start);
        label.set_selectable(true);
        self.grid.attach(&label, column as i32, row, 1, 1);
        label
    }

    pub fn set_body(&self, body: &TableBody) {
        while let Some(child) = self.grid.first_child() {
            self.grid.remove(&child);
        }

        let columns = self.scope.columns();
        for (column, title) in columns.iter().enumerate() {
            self.cell(title, column, 0).add_css_class("heading");
        }

        let rows = match body {
            TableBody::Placeholder(placeholder) => {
                let label = gtk::Label::new(Some(placeholder.text()));
                label.add_css_class("dim-label");
                label.set_halign(gtk::Align::Start);
                self.grid.attach(&label, 0, 1, columns.len() as i32, 1);
                return;
            }
            TableBody::Rows(rows) => rows,
        };

        for (index, row) in rows.iter().enumerate() {
            let line = index as i32 + 1;
            let cells = row.cells();
            for (column, text) in cells.iter().enumerate() {
                self.cell(text, column, line);
            }

            let Some(id) = row.id.clone() else { continue };
            let actions = gtk::Box::new(gtk::Orientation::Horizontal, 6);

            let edit_btn = gtk::Button::with_label("Edit");
            {
                let commands = self.commands.clone();
                let id = id.clone();
                edit_btn.connect_clicked(move |_| {
                    let _ = commands.send(Command::StartEdit(id.clone()));
                });
            }
            let delete_btn = gtk::Button::with_label("Delete");
            delete_btn.add_css_class("destructive-action");
            {
                let commands = self.commands.clone();
                delete_btn.connect_clicked(move |_| {
                    let _ = commands.send(Command::Delete(id.clone()));
                });
            }

            actions.append(&edit_btn);
            actions.append(&delete_btn);
            self.grid.attach(&actions, cells.len() as i32, line, 1, 1);
        }
    }
}
