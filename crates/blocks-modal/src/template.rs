#![forbid(unsafe_code)]

//! Header and footer injection points.
//!
//! Content may supply header or footer templates that the surrounding modal
//! renders in its chrome. Supplying one with no enclosing modal is a misuse
//! that is logged and otherwise ignored.

use tracing::warn;

pub const HEADER_OUTSIDE_MODAL: &str = "[ModalHeader] template used outside of a modal.";
pub const FOOTER_OUTSIDE_MODAL: &str = "[ModalFooter] template used outside of a modal.";

/// Opaque template handle. The host decides what the name renders to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template(String);

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Something that can host header/footer templates.
pub trait TemplateTarget {
    fn set_header_template(&self, template: Template);
    fn set_footer_template(&self, template: Template);
}

/// Install `template` as the header of `modal`. Returns whether it was
/// applied.
pub fn attach_header(
    modal: Option<&dyn TemplateTarget>,
    template: Template,
    warn_on_misuse: bool,
) -> bool {
    match modal {
        Some(target) => {
            target.set_header_template(template);
            true
        }
        None => {
            if warn_on_misuse {
                warn!(template = template.name(), "{HEADER_OUTSIDE_MODAL}");
            }
            false
        }
    }
}

/// Install `template` as the footer of `modal`. Returns whether it was
/// applied.
pub fn attach_footer(
    modal: Option<&dyn TemplateTarget>,
    template: Template,
    warn_on_misuse: bool,
) -> bool {
    match modal {
        Some(target) => {
            target.set_footer_template(template);
            true
        }
        None => {
            if warn_on_misuse {
                warn!(template = template.name(), "{FOOTER_OUTSIDE_MODAL}");
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Chrome {
        header: RefCell<Option<Template>>,
        footer: RefCell<Option<Template>>,
    }

    impl TemplateTarget for Chrome {
        fn set_header_template(&self, template: Template) {
            *self.header.borrow_mut() = Some(template);
        }

        fn set_footer_template(&self, template: Template) {
            *self.footer.borrow_mut() = Some(template);
        }
    }

    #[test]
    fn attaches_inside_modal() {
        let chrome = Chrome::default();
        assert!(attach_header(Some(&chrome), Template::new("title"), true));
        assert!(attach_footer(Some(&chrome), Template::new("actions"), true));
        assert_eq!(chrome.header.borrow().as_ref().map(Template::name), Some("title"));
        assert_eq!(chrome.footer.borrow().as_ref().map(Template::name), Some("actions"));
    }

    #[test]
    fn outside_modal_is_ignored() {
        assert!(!attach_header(None, Template::new("title"), true));
        assert!(!attach_footer(None, Template::new("actions"), false));
    }
}
