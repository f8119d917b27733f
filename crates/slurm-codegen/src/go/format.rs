use crate::functions::FormatTypeFuncs;

pub struct FormatTypeFunc;

impl FormatTypeFuncs for FormatTypeFunc {
    fn format_kind_sequence(&self, representation: &str) -> String {
        format!("[]{representation}")
    }

    fn format_kind_map(&self, representation: &str) -> String {
        format!("map[string]{representation}")
    }

    fn format_kind_timestamp(&self) -> String {
        "time.Time".into()
    }

    fn format_kind_any(&self) -> String {
        "interface{}".into()
    }

    fn format_kind_named(&self, name: &str) -> String {
        name.to_string()
    }

    fn format_kind_nullable(&self, representation: &str) -> String {
        format!("*{representation}")
    }
}
