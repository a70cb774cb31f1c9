pub fn value_to_short_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => arr
            .iter()
            .map(value_to_short_string)
            .collect::<Vec<_>>()
            .join(", "),
        serde_json::Value::Object(obj) => {
            let mut parts = Vec::new();
            for (key, val) in obj {
                parts.push(format!("{}: {}", key, value_to_short_string(val)));
            }
            parts.join(", ")
        }
        serde_json::Value::Null => String::new(),
    }
}

/// Renders a MiB amount the way the tables show it ("4096 MiB" / "16 GiB").
pub fn format_memory_mib(memory: i64) -> String {
    if memory >= 1024 && memory % 1024 == 0 {
        format!("{} GiB", memory / 1024)
    } else {
        format!("{} MiB", memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_is_shown_in_whole_gib_when_possible() {
        assert_eq!(format_memory_mib(4096), "4 GiB");
        assert_eq!(format_memory_mib(1536), "1536 MiB");
        assert_eq!(format_memory_mib(512), "512 MiB");
    }
}
