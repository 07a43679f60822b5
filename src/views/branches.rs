use crate::api::ApiError;
use crate::models::{Local, LocalCreateDto, LocalUpdateDto};
use crate::services::LocalRepository;
use crate::types::LocalId;

use super::Notification;

/// Branches whose name, code, or address contains `term`, ignoring case.
/// A blank term matches everything.
#[must_use]
pub fn filter_locales<'a>(locales: &'a [Local], term: &str) -> Vec<&'a Local> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return locales.iter().collect();
    }
    locales
        .iter()
        .filter(|local| {
            local.local_name.to_lowercase().contains(&term)
                || local
                    .local_code
                    .as_deref()
                    .is_some_and(|code| code.to_lowercase().contains(&term))
                || local.address.to_lowercase().contains(&term)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl BranchStats {
    #[must_use]
    pub fn from_locales(locales: &[Local]) -> Self {
        let total = locales.len();
        let active = locales.iter().filter(|l| l.is_active).count();
        Self {
            total,
            active,
            inactive: total - active,
        }
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("branch form has invalid fields")]
pub struct BranchFormErrors {
    pub local_name: Option<&'static str>,
    pub address: Option<&'static str>,
}

impl BranchFormErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.local_name.is_none() && self.address.is_none()
    }
}

/// Create/edit form for a branch, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchForm {
    pub local_name: String,
    pub address: String,
    pub phone: String,
}

impl BranchForm {
    #[must_use]
    pub fn from_local(local: &Local) -> Self {
        Self {
            local_name: local.local_name.clone(),
            address: local.address.clone(),
            phone: local.phone.clone().unwrap_or_default(),
        }
    }

    /// Name and address are required; phone is optional.
    ///
    /// # Errors
    ///
    /// [`BranchFormErrors`] naming each missing field.
    pub fn validate(&self) -> Result<LocalCreateDto, BranchFormErrors> {
        let local_name = self.local_name.trim();
        let address = self.address.trim();
        let phone = self.phone.trim();

        let errors = BranchFormErrors {
            local_name: local_name.is_empty().then_some("Name is required"),
            address: address.is_empty().then_some("Address is required"),
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(LocalCreateDto {
            local_name: local_name.to_owned(),
            address: address.to_owned(),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] BranchFormErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The `/sucursales` page: list, search, stats, and the create/edit modal.
pub struct BranchesView<R> {
    repo: R,
    locales: Vec<Local>,
    loading: bool,
    search: String,
    modal_open: bool,
    selected: Option<Local>,
    form: BranchForm,
    form_errors: BranchFormErrors,
    saving: bool,
    notification: Option<Notification>,
}

impl<R: LocalRepository> BranchesView<R> {
    /// Starts in the loading state; call [`load`](Self::load) on mount.
    #[must_use]
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            locales: Vec::new(),
            loading: true,
            search: String::new(),
            modal_open: false,
            selected: None,
            form: BranchForm::default(),
            form_errors: BranchFormErrors::default(),
            saving: false,
            notification: None,
        }
    }

    pub async fn load(&mut self) {
        self.loading = true;
        match self.repo.get_all().await {
            Ok(locales) => self.locales = locales,
            // The client already sent the user to the login page.
            Err(ApiError::Unauthorized) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to load branches");
                self.notification = Some(Notification::error("Could not load branches"));
            }
        }
        self.loading = false;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn locales(&self) -> &[Local] {
        &self.locales
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Branches matching the current search.
    #[must_use]
    pub fn visible(&self) -> Vec<&Local> {
        filter_locales(&self.locales, &self.search)
    }

    /// Stats over every loaded branch, regardless of the search.
    #[must_use]
    pub fn stats(&self) -> BranchStats {
        BranchStats::from_locales(&self.locales)
    }

    /// Placeholder text when nothing is listed.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.loading || !self.visible().is_empty() {
            None
        } else if self.search.is_empty() {
            Some("No branches yet")
        } else {
            Some("No branches found")
        }
    }

    pub fn open_create(&mut self) {
        self.selected = None;
        self.open_modal(BranchForm::default());
    }

    pub fn open_edit(&mut self, local: Local) {
        let form = BranchForm::from_local(&local);
        self.selected = Some(local);
        self.open_modal(form);
    }

    fn open_modal(&mut self, form: BranchForm) {
        self.form = form;
        self.form_errors = BranchFormErrors::default();
        self.modal_open = true;
    }

    /// Close the modal and discard the form. Ignored while saving.
    pub fn close(&mut self) {
        if self.saving {
            return;
        }
        self.modal_open = false;
        self.form = BranchForm::default();
        self.form_errors = BranchFormErrors::default();
    }

    #[must_use]
    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    #[must_use]
    pub fn modal_title(&self) -> &'static str {
        if self.selected.is_some() {
            "Edit branch"
        } else {
            "New branch"
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Local> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn form(&self) -> &BranchForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BranchForm {
        &mut self.form
    }

    #[must_use]
    pub fn form_errors(&self) -> &BranchFormErrors {
        &self.form_errors
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Submit the modal form.
    ///
    /// Updates the selected branch, keeping its id and active flag, or
    /// creates a new one. On success the modal closes and the list
    /// reloads; on failure the modal stays open.
    ///
    /// # Errors
    ///
    /// [`SaveError::Invalid`] when validation fails (nothing is sent) and
    /// [`SaveError::Api`] when the backend call fails.
    pub async fn save(&mut self) -> Result<(), SaveError> {
        let dto = match self.form.validate() {
            Ok(dto) => dto,
            Err(errors) => {
                self.form_errors = errors.clone();
                return Err(errors.into());
            }
        };
        self.form_errors = BranchFormErrors::default();

        self.saving = true;
        let result = match &self.selected {
            Some(local) => self
                .repo
                .update(local.local_id, LocalUpdateDto::for_local(local, dto))
                .await
                .map(|_| "Branch updated"),
            None => self.repo.create(dto).await.map(|_| "Branch created"),
        };
        self.saving = false;

        match result {
            Ok(message) => {
                self.notification = Some(Notification::success(message));
                self.close();
                self.load().await;
                Ok(())
            }
            Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized.into()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to save branch");
                self.notification = Some(Notification::error("Could not save branch"));
                Err(e.into())
            }
        }
    }

    /// Activate or deactivate a branch, then reload.
    pub async fn toggle_active(&mut self, id: LocalId) {
        let was_active = self
            .locales
            .iter()
            .find(|l| l.local_id == id)
            .map(|l| l.is_active);

        match self.repo.toggle_active(id).await {
            Ok(updated) => {
                let deactivated = was_active.unwrap_or(!updated.is_active);
                let message = if deactivated {
                    "Branch deactivated"
                } else {
                    "Branch activated"
                };
                self.notification = Some(Notification::success(message));
                self.load().await;
            }
            Err(ApiError::Unauthorized) => {}
            Err(e) => {
                tracing::error!(error = %e, local_id = %id, "Failed to toggle branch");
                self.notification = Some(Notification::error("Could not change branch status"));
            }
        }
    }

    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }
}
