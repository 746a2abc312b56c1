use std::collections::VecDeque;
use std::fmt::Write;

use tracing::{error, info};

use crate::client::ListingsClient;
use crate::errors::DashboardError;
use crate::types::{Attachment, Listing, ListingDraft};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Transient message shown after an action completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn success(text: String) -> Self {
        Self { kind: NoticeKind::Success, text }
    }

    fn failure(text: String) -> Self {
        Self { kind: NoticeKind::Failure, text }
    }
}

/// The single create/edit form.
#[derive(Clone, Debug, Default)]
pub struct ModalForm {
    pub open: bool,
    pub editing: bool,
    pub focus: Option<Listing>,
    pub draft: ListingDraft,
    pub attachment: Option<Attachment>,
}

/// View state of the dashboard. Every action awaits its request to completion
/// and then re-fetches the collection.
pub struct Dashboard {
    client: ListingsClient,
    listings: Vec<Listing>,
    loading: bool,
    submitting: bool,
    modal: ModalForm,
    notices: VecDeque<Notice>,
}

impl Dashboard {
    pub fn new(client: ListingsClient) -> Self {
        Self {
            client,
            listings: Vec::new(),
            loading: false,
            submitting: false,
            modal: ModalForm::default(),
            notices: VecDeque::new(),
        }
    }

    pub fn listings(&self) -> &[Listing] { &self.listings }

    pub fn is_loading(&self) -> bool { self.loading }

    pub fn is_submitting(&self) -> bool { self.submitting }

    pub fn modal(&self) -> &ModalForm { &self.modal }

    pub fn draft_mut(&mut self) -> &mut ListingDraft { &mut self.modal.draft }

    pub fn attach(&mut self, attachment: Attachment) {
        self.modal.attachment = Some(attachment);
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Drain pending notifications, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Replace the list with the server's collection. A failed fetch keeps the previous list.
    pub async fn refresh(&mut self) {
        self.loading = true;
        match self.client.list().await {
            Ok(listings) => self.listings = listings,
            Err(e) => error!(err = %e, "failed to fetch listings"),
        }
        self.loading = false;
    }

    pub fn open_create(&mut self) {
        self.modal = ModalForm { open: true, ..Default::default() };
    }

    /// Open the form on `listing`. The attachment starts empty, so saving
    /// without picking a file sends no image.
    pub fn open_edit(&mut self, listing: &Listing) {
        self.modal = ModalForm {
            open: true,
            editing: true,
            focus: Some(listing.clone()),
            draft: ListingDraft::from_listing(listing),
            attachment: None,
        };
    }

    pub fn cancel(&mut self) {
        self.modal = ModalForm::default();
    }

    /// Validate the draft and send it as a create or an update. A draft that
    /// fails validation leaves the form open and sends nothing; otherwise the
    /// form is reset and the list re-fetched whatever the outcome.
    pub async fn submit(&mut self) -> Result<(), DashboardError> {
        self.modal.draft.validate()?;

        self.submitting = true;
        let name = self.modal.draft.name.clone();
        let editing_id = self.modal.focus.as_ref().map(|l| l.id.clone()).filter(|_| self.modal.editing);
        let attachment = self.modal.attachment.as_ref();

        let notice = match editing_id {
            Some(id) => match self.client.update(&id, &self.modal.draft, attachment).await {
                Ok(updated) => {
                    info!(id = %updated.id, "listing modified");
                    Notice::success(format!("Successfully modified: {name}"))
                }
                Err(e) => {
                    error!(err = %e, %id, "failed to modify listing");
                    Notice::failure(format!("Failed to modify: {name}"))
                }
            },
            None => match self.client.create(&self.modal.draft, attachment).await {
                Ok(created) => {
                    info!(id = %created.id, "listing created");
                    Notice::success(format!("Successfully created: {name}"))
                }
                Err(e) => {
                    error!(err = %e, "failed to create listing");
                    Notice::failure(format!("Failed to submit: {name}"))
                }
            },
        };
        self.notices.push_back(notice);

        self.submitting = false;
        self.modal = ModalForm::default();
        self.refresh().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: &str, name: &str) {
        let notice = match self.client.delete(id).await {
            Ok(()) => Notice::success(format!("Successfully deleted: {name}")),
            Err(e) => {
                error!(err = %e, %id, "failed to delete listing");
                Notice::failure(format!("Failed to delete: {name}"))
            }
        };
        self.notices.push_back(notice);
        self.refresh().await;
    }

    /// Text rendering of the dashboard, the open form and pending notices.
    pub fn render(&self) -> String {
        let mut out = String::from("Dashboard  [+ New Listing]\n");
        if self.loading {
            out.push_str("  ... loading\n");
        } else if self.listings.is_empty() {
            out.push_str("  (no listings)\n");
        } else {
            for (i, l) in self.listings.iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {}  [{}]", i + 1, l.name, l.id);
                let _ = writeln!(out, "     {}", l.about);
                if let Some(image) = &l.image {
                    let _ = writeln!(out, "     image: {image}");
                }
            }
        }

        if self.modal.open {
            let title = if self.modal.editing { "Edit Listing" } else { "New Listing" };
            let _ = writeln!(out, "\n== {title} ==");
            if self.submitting {
                out.push_str("  ... saving\n");
            } else {
                let _ = writeln!(out, "  name:  {}", self.modal.draft.name);
                let _ = writeln!(out, "  about: {}", self.modal.draft.about);
                match &self.modal.attachment {
                    Some(att) => { let _ = writeln!(out, "  image: {}", att.file_name); }
                    None => out.push_str("  image: (none)\n"),
                }
            }
        }

        for n in &self.notices {
            let mark = match n.kind {
                NoticeKind::Success => "ok",
                NoticeKind::Failure => "!!",
            };
            let _ = writeln!(out, "[{mark}] {}", n.text);
        }
        out
    }
}
