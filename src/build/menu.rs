use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::document::{CallbackDescriptor, MenuDescriptor, MessageDescriptor};
use crate::error::{AdapterError, Result};
use crate::ids::{EntityKind, IdAllocator};

pub const UNKNOWN_FUNCNAME: &str = "Unknown";
pub const DEFAULT_TRIGGER: &str = "click";
pub const DEFAULT_MESSAGE_TYPE: &str = "default";

/// Declarative description of a menu entry.
///
/// `title` is required when the menu is built. Unless `callback` is false, a
/// callback is built alongside the menu, calling `funcname` (or the
/// `"Unknown"` placeholder).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuSpec {
    pub title: Option<String>,
    pub funcname: Option<String>,
    pub is_method: bool,
    pub trigger: Option<String>,
    pub known_args: Vec<String>,
    pub required_args: IndexMap<String, Value>,
    pub callback: bool,
    pub menus: Vec<MenuSpec>,
    pub messages: Vec<MessageSpec>,
}

impl Default for MenuSpec {
    fn default() -> Self {
        Self {
            title: None,
            funcname: None,
            is_method: false,
            trigger: None,
            known_args: Vec::new(),
            required_args: IndexMap::new(),
            callback: true,
            menus: Vec::new(),
            messages: Vec::new(),
        }
    }
}

impl MenuSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// A menu holding only a title and sub-menus.
    pub fn navigational(title: impl Into<String>) -> Self {
        Self {
            callback: false,
            ..Self::new(title)
        }
    }

    pub fn with_funcname(mut self, funcname: impl Into<String>) -> Self {
        self.funcname = Some(funcname.into());
        self
    }

    pub fn as_method(mut self) -> Self {
        self.is_method = true;
        self
    }

    pub fn with_known_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_required_arg(mut self, name: impl Into<String>, spec: Value) -> Self {
        self.required_args.insert(name.into(), spec);
        self
    }

    pub fn with_submenu(mut self, menu: MenuSpec) -> Self {
        self.menus.push(menu);
        self
    }

    pub fn with_message(mut self, message: MessageSpec) -> Self {
        self.messages.push(message);
        self
    }

    fn callback_spec(&self) -> CallbackSpec {
        CallbackSpec {
            funcname: Some(
                self.funcname
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_FUNCNAME.to_string()),
            ),
            is_method: self.is_method,
            trigger: self.trigger.clone(),
            known_args: self.known_args.clone(),
            required_args: self.required_args.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CallbackSpec {
    pub funcname: Option<String>,
    pub is_method: bool,
    pub trigger: Option<String>,
    pub known_args: Vec<String>,
    pub required_args: IndexMap<String, Value>,
}

impl CallbackSpec {
    pub fn new(funcname: impl Into<String>) -> Self {
        Self {
            funcname: Some(funcname.into()),
            ..Self::default()
        }
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageSpec {
    pub text: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub title: String,
}

impl Default for MessageSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            message_type: DEFAULT_MESSAGE_TYPE.to_string(),
            title: String::new(),
        }
    }
}

impl MessageSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = message_type.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Build a menu, its callback and its nested entries, depth first.
pub fn build_menu(spec: &MenuSpec, ids: &mut IdAllocator) -> Result<MenuDescriptor> {
    let title = spec.title.clone().ok_or(AdapterError::MissingField {
        field: "title",
        context: "menu",
    })?;
    let id = ids.next(EntityKind::Menu);
    let callback = if spec.callback {
        Some(build_callback(&spec.callback_spec(), ids))
    } else {
        None
    };
    Ok(MenuDescriptor {
        id,
        title,
        callback,
        menus: build_menus(&spec.menus, ids)?,
        messages: build_messages(&spec.messages, ids),
    })
}

pub fn build_menus(specs: &[MenuSpec], ids: &mut IdAllocator) -> Result<IndexMap<String, MenuDescriptor>> {
    let mut menus = IndexMap::with_capacity(specs.len());
    for spec in specs {
        let menu = build_menu(spec, ids)?;
        menus.insert(menu.id.clone(), menu);
    }
    Ok(menus)
}

pub fn build_callback(spec: &CallbackSpec, ids: &mut IdAllocator) -> CallbackDescriptor {
    CallbackDescriptor {
        id: ids.next(EntityKind::Callback),
        funcname: spec.funcname.clone(),
        is_method: spec.is_method,
        trigger: spec
            .trigger
            .clone()
            .unwrap_or_else(|| DEFAULT_TRIGGER.to_string()),
        known_args: spec.known_args.clone(),
        required_args: spec.required_args.clone(),
    }
}

pub fn build_callbacks(specs: &[CallbackSpec], ids: &mut IdAllocator) -> IndexMap<String, CallbackDescriptor> {
    specs
        .iter()
        .map(|spec| {
            let callback = build_callback(spec, ids);
            (callback.id.clone(), callback)
        })
        .collect()
}

pub fn build_message(spec: &MessageSpec, ids: &mut IdAllocator) -> MessageDescriptor {
    MessageDescriptor {
        id: ids.next(EntityKind::Message),
        message_type: spec.message_type.clone(),
        title: spec.title.clone(),
        text: spec.text.clone(),
    }
}

pub fn build_messages(specs: &[MessageSpec], ids: &mut IdAllocator) -> IndexMap<String, MessageDescriptor> {
    specs
        .iter()
        .map(|spec| {
            let message = build_message(spec, ids);
            (message.id.clone(), message)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ToRecord;
    use serde_json::json;

    #[test]
    fn menu_from_title_only_gets_placeholder_callback() {
        let mut ids = IdAllocator::starting_at(1).with_base_id("mycanvas");
        let spec: MenuSpec = serde_json::from_value(json!({"title": "My function call"})).unwrap();
        let menu = build_menu(&spec, &mut ids).unwrap();
        assert_eq!(
            menu.to_record().unwrap().into_value(),
            json!({
                "id": "mycanvas_menu2",
                "title": "My function call",
                "callback": {
                    "id": "mycanvas_callback3", "funcname": "Unknown", "trigger": "click",
                    "knownArgs": [], "requiredArgs": {}
                },
                "menus": {},
                "messages": {}
            })
        );
    }

    #[test]
    fn missing_title_is_rejected() {
        let mut ids = IdAllocator::new();
        let spec: MenuSpec = serde_json::from_value(json!({"funcname": "cardinality"})).unwrap();
        let err = build_menu(&spec, &mut ids).unwrap_err();
        assert!(matches!(err, AdapterError::MissingField { field: "title", .. }));
    }

    #[test]
    fn method_menu_keeps_is_method_internal() {
        let mut ids = IdAllocator::new();
        let spec = MenuSpec::new("cardinality")
            .with_funcname("cardinality")
            .as_method()
            .with_known_args(["<object>", "{1,2,3}"]);
        let menu = build_menu(&spec, &mut ids).unwrap();
        let callback = menu.callback.as_ref().unwrap();
        assert!(callback.is_method);
        let record = callback.to_record().unwrap();
        assert!(!record.contains_key("is_method"));
        assert_eq!(record.get("knownArgs"), Some(&json!(["<object>", "{1,2,3}"])));
    }

    #[test]
    fn nested_entries_are_indexed_by_their_ids() {
        let mut ids = IdAllocator::new();
        let spec = MenuSpec::navigational("Subgroup Lattice")
            .with_submenu(MenuSpec::new("All Subgroups").with_funcname("subgroups"))
            .with_message(MessageSpec::new("8 levels").with_type("info"));
        let menu = build_menu(&spec, &mut ids).unwrap();
        assert_eq!(menu.id, "F1");
        assert!(menu.callback.is_none());
        assert_eq!(menu.menus.keys().collect::<Vec<_>>(), vec!["F2"]);
        assert_eq!(menu.menus["F2"].callback.as_ref().unwrap().id, "F3");
        assert_eq!(menu.messages.keys().collect::<Vec<_>>(), vec!["F4"]);
        assert_eq!(menu.messages["F4"].message_type, "info");
    }

    #[test]
    fn navigational_menu_from_json() {
        let spec: MenuSpec = serde_json::from_value(json!({
            "title": "Browse",
            "callback": false,
            "menus": [{"title": "Leaf", "required_args": {"n": {"type": "number"}}}]
        }))
        .unwrap();
        let mut ids = IdAllocator::new();
        let menu = build_menu(&spec, &mut ids).unwrap();
        assert!(menu.callback.is_none());
        let leaf = &menu.menus["F2"];
        assert_eq!(
            leaf.callback.as_ref().unwrap().required_args["n"],
            json!({"type": "number"})
        );
    }

    #[test]
    fn message_defaults() {
        let mut ids = IdAllocator::new();
        let spec: MessageSpec = serde_json::from_value(json!({"text": "There are 8 levels"})).unwrap();
        let message = build_message(&spec, &mut ids);
        assert_eq!(
            message.to_record().unwrap().into_value(),
            json!({"id": "F1", "type": "default", "title": "", "text": "There are 8 levels"})
        );
    }
}
