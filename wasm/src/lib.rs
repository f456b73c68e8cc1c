use archdiagram_layout::{Diagram, LayoutDump, LayoutOptions, compute_layout};
use wasm_bindgen::prelude::*;

fn layout_json(diagram_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let diagram: Diagram = serde_json::from_str(diagram_json).map_err(|error| error.to_string())?;
    let options = match options_json {
        Some(raw) => serde_json::from_str::<LayoutOptions>(raw).map_err(|error| error.to_string())?,
        None => LayoutOptions::default(),
    };
    let layout = compute_layout(&diagram, &options);
    serde_json::to_string(&LayoutDump::from_layout(&layout)).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn layout_diagram(diagram_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    layout_json(diagram_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::layout_json;

    #[test]
    fn lays_out_snapshot_from_host() {
        let diagram = r#"{
            "nodes": [
                {"id": "A", "kind": "start-event"},
                {"id": "B", "kind": "task", "label": "Validate input"},
                {"id": "C", "kind": "end-event"}
            ],
            "edges": [{"from": "A", "to": "B"}, {"from": "B", "to": "C"}]
        }"#;
        let out = layout_json(diagram, Some(r#"{"direction": "LR", "margin": 10}"#))
            .expect("snapshot should lay out");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["direction"], "LR");
        assert_eq!(value["nodes"][0]["x"], 10.0);
        assert_eq!(value["nodes"][2]["rank"], 2);
    }

    #[test]
    fn rejects_unknown_direction() {
        let err = layout_json(r#"{"nodes": []}"#, Some(r#"{"direction": "up"}"#)).unwrap_err();
        assert!(err.contains("unknown layout direction"));
    }

    #[test]
    fn host_options_reach_the_layout() {
        let diagram = r#"{
            "nodes": [{"id": "A", "kind": "task"}, {"id": "B", "kind": "task"}],
            "edges": [{"from": "A", "to": "B"}]
        }"#;
        let out = layout_json(
            diagram,
            Some(r#"{"rankSpacing": 30, "margin": 0, "orderPasses": 2}"#),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["nodes"][1]["y"], 90.0);
    }
}
