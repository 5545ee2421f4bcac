//! Info-block comparison.

use crate::diff::change::{Category, Severity};
use crate::diff::walker::{json_value, Walker};
use crate::model::{Contact, Info, License};

const CAT: Category = Category::Info;

impl Walker<'_> {
    /// Compare the `info` blocks. Skipped entirely when the caller set
    /// `IncludeInfo = false`.
    pub(crate) fn diff_info(&mut self, path: &str, source: &Info, target: &Info) {
        if !self.include_info() {
            return;
        }

        self.diff_text_field(
            path,
            CAT,
            "title",
            Severity::Info,
            Some(&source.title),
            Some(&target.title),
        );
        self.diff_text_field(
            path,
            CAT,
            "version",
            Severity::Info,
            Some(&source.version),
            Some(&target.version),
        );
        self.diff_text_field(
            path,
            CAT,
            "summary",
            Severity::Info,
            source.summary.as_deref(),
            target.summary.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "termsOfService",
            Severity::Info,
            source.terms_of_service.as_deref(),
            target.terms_of_service.as_deref(),
        );

        self.diff_contact(path, source.contact.as_ref(), target.contact.as_ref());
        self.diff_license(path, source.license.as_ref(), target.license.as_ref());
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    fn diff_contact(&mut self, path: &str, source: Option<&Contact>, target: Option<&Contact>) {
        let contact_path = format!("{path}.contact");
        match (source, target) {
            (None, None) => {}
            (None, Some(contact)) => self.record_added(
                &contact_path,
                CAT,
                "contact",
                Severity::Info,
                json_value(contact),
                "contact added",
            ),
            (Some(contact), None) => self.record_removed(
                &contact_path,
                CAT,
                "contact",
                Severity::Info,
                json_value(contact),
                "contact removed",
            ),
            (Some(old), Some(new)) => {
                self.diff_text_field(
                    &contact_path,
                    CAT,
                    "name",
                    Severity::Info,
                    old.name.as_deref(),
                    new.name.as_deref(),
                );
                self.diff_text_field(
                    &contact_path,
                    CAT,
                    "url",
                    Severity::Info,
                    old.url.as_deref(),
                    new.url.as_deref(),
                );
                self.diff_text_field(
                    &contact_path,
                    CAT,
                    "email",
                    Severity::Info,
                    old.email.as_deref(),
                    new.email.as_deref(),
                );
            }
        }
    }

    fn diff_license(&mut self, path: &str, source: Option<&License>, target: Option<&License>) {
        let license_path = format!("{path}.license");
        match (source, target) {
            (None, None) => {}
            (None, Some(license)) => self.record_added(
                &license_path,
                CAT,
                "license",
                Severity::Info,
                json_value(license),
                "license added",
            ),
            (Some(license), None) => self.record_removed(
                &license_path,
                CAT,
                "license",
                Severity::Info,
                json_value(license),
                "license removed",
            ),
            (Some(old), Some(new)) => {
                self.diff_text_field(
                    &license_path,
                    CAT,
                    "name",
                    Severity::Info,
                    Some(&old.name),
                    Some(&new.name),
                );
                self.diff_text_field(
                    &license_path,
                    CAT,
                    "identifier",
                    Severity::Info,
                    old.identifier.as_deref(),
                    new.identifier.as_deref(),
                );
                self.diff_text_field(
                    &license_path,
                    CAT,
                    "url",
                    Severity::Info,
                    old.url.as_deref(),
                    new.url.as_deref(),
                );
            }
        }
    }
}
