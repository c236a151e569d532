use crate::schema::form_type_id;
use std::sync::Arc;

/// Caller-supplied read of one attribute of a list item.
pub type Accessor<'a, T, R> = Arc<dyn Fn(&T) -> R + 'a>;

/// What an item carries for the attachment facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentProbe {
    pub has_location: bool,
    /// Attachment type names as stored on the item, e.g. `File`, `Sketch`.
    pub attachment_types: Vec<String>,
}

/// What an item carries for the log-type facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogTypeProbe {
    /// The item's own `type` field.
    pub kind: Option<String>,
    pub has_task: bool,
    /// Id of the custom form template the entry was submitted through.
    pub form_template_id: Option<String>,
}

impl LogTypeProbe {
    /// Own type plus the `task` and `form::<templateId>` pseudo ids.
    pub fn type_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(3);
        if let Some(kind) = self.kind.as_ref().filter(|kind| !kind.is_empty()) {
            ids.push(kind.clone());
        }
        if self.has_task {
            ids.push("task".to_string());
        }
        if let Some(template_id) = self.form_template_id.as_ref().filter(|id| !id.is_empty()) {
            ids.push(form_type_id(template_id));
        }
        ids
    }
}

/// Accessor record for one item type. Facets and sorts whose accessor is
/// missing are left out of the engine.
pub struct ItemAccessors<'a, T> {
    pub display_name: Option<Accessor<'a, T, String>>,
    pub author: Option<Accessor<'a, T, Option<String>>>,
    pub timestamp: Option<Accessor<'a, T, Option<i64>>>,
    pub type_ids: Option<Accessor<'a, T, Vec<String>>>,
    pub stage: Option<Accessor<'a, T, Option<String>>>,
    pub attachments: Option<Accessor<'a, T, AttachmentProbe>>,
    pub log_type: Option<Accessor<'a, T, LogTypeProbe>>,
}

impl<'a, T> Default for ItemAccessors<'a, T> {
    fn default() -> Self {
        Self {
            display_name: None,
            author: None,
            timestamp: None,
            type_ids: None,
            stage: None,
            attachments: None,
            log_type: None,
        }
    }
}

impl<'a, T> Clone for ItemAccessors<'a, T> {
    fn clone(&self) -> Self {
        Self {
            display_name: self.display_name.clone(),
            author: self.author.clone(),
            timestamp: self.timestamp.clone(),
            type_ids: self.type_ids.clone(),
            stage: self.stage.clone(),
            attachments: self.attachments.clone(),
            log_type: self.log_type.clone(),
        }
    }
}

impl<'a, T> ItemAccessors<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display_name(mut self, accessor: impl Fn(&T) -> String + 'a) -> Self {
        self.display_name = Some(Arc::new(accessor));
        self
    }

    pub fn with_author(mut self, accessor: impl Fn(&T) -> Option<String> + 'a) -> Self {
        self.author = Some(Arc::new(accessor));
        self
    }

    pub fn with_timestamp(mut self, accessor: impl Fn(&T) -> Option<i64> + 'a) -> Self {
        self.timestamp = Some(Arc::new(accessor));
        self
    }

    pub fn with_type_ids(mut self, accessor: impl Fn(&T) -> Vec<String> + 'a) -> Self {
        self.type_ids = Some(Arc::new(accessor));
        self
    }

    pub fn with_stage(mut self, accessor: impl Fn(&T) -> Option<String> + 'a) -> Self {
        self.stage = Some(Arc::new(accessor));
        self
    }

    pub fn with_attachments(mut self, accessor: impl Fn(&T) -> AttachmentProbe + 'a) -> Self {
        self.attachments = Some(Arc::new(accessor));
        self
    }

    pub fn with_log_type(mut self, accessor: impl Fn(&T) -> LogTypeProbe + 'a) -> Self {
        self.log_type = Some(Arc::new(accessor));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_type_probe_adds_pseudo_ids() {
        let probe = LogTypeProbe {
            kind: Some("update".to_string()),
            has_task: true,
            form_template_id: Some("tpl-1".to_string()),
        };
        assert_eq!(probe.type_ids(), vec!["update", "task", "form::tpl-1"]);
        assert!(LogTypeProbe::default().type_ids().is_empty());
    }
}
