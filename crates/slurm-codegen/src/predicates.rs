use slurm_core::SchemaNode;

pub fn is_reference(node: &SchemaNode) -> bool {
    node.reference.is_some()
}

pub fn is_array(node: &SchemaNode) -> bool {
    node.is_type("array")
}

pub fn is_object(node: &SchemaNode) -> bool {
    node.is_type("object")
}

pub fn is_inline_object(node: &SchemaNode) -> bool {
    is_object(node) && !node.properties.is_empty()
}

pub fn is_map_object(node: &SchemaNode) -> bool {
    is_object(node) && node.properties.is_empty()
}

pub fn has_enum(node: &SchemaNode) -> bool {
    node.enum_values.is_some()
}

/// Deprecated schemas that no longer declare any properties.
pub fn is_deprecated_stub(node: &SchemaNode) -> bool {
    node.deprecated && node.properties.is_empty()
}

/// An inline object nested as the item of an array property.
pub fn is_array_of_inline_objects(node: &SchemaNode) -> bool {
    is_array(node) && node.items.as_deref().is_some_and(is_inline_object)
}

/// A map whose values are inline objects.
pub fn is_map_of_inline_objects(node: &SchemaNode) -> bool {
    is_map_object(node)
        && node
            .additional_properties
            .as_ref()
            .and_then(|extra| extra.schema())
            .is_some_and(is_inline_object)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use slurm_core::SchemaNode;

    use super::*;

    fn node(value: serde_json::Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn inline_object_needs_properties() {
        assert!(is_inline_object(&node(json!({"type": "object", "properties": {"a": {"type": "string"}}}))));
        assert!(!is_inline_object(&node(json!({"type": "object"}))));
        assert!(is_map_object(&node(json!({"type": "object", "additionalProperties": true}))));
    }

    #[test]
    fn deprecated_stub_has_no_properties() {
        assert!(is_deprecated_stub(&node(json!({"deprecated": true}))));
        assert!(!is_deprecated_stub(&node(
            json!({"deprecated": true, "properties": {"a": {"type": "string"}}})
        )));
        assert!(!is_deprecated_stub(&node(json!({"type": "object"}))));
    }

    #[test]
    fn array_of_inline_objects() {
        let n = node(json!({
            "type": "array",
            "items": {"type": "object", "properties": {"a": {"type": "string"}}}
        }));

        assert!(is_array(&n));
        assert!(is_array_of_inline_objects(&n));
        assert!(!has_enum(&n));
        assert!(!is_reference(&n));
    }

    #[test]
    fn map_of_inline_objects() {
        let n = node(json!({
            "type": "object",
            "additionalProperties": {"type": "object", "properties": {"v": {"type": "string"}}}
        }));

        assert!(is_map_of_inline_objects(&n));
        assert!(!is_map_of_inline_objects(&node(json!({
            "type": "object", "additionalProperties": {"type": "string"}
        }))));
    }
}
