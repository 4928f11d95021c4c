// INI text codec for Engine.ini style files

use std::path::Path;

use enginetune_core::SectionMap;

/// Section -> key -> value. Sections and keys iterate in sorted order.
pub type IniDocument = SectionMap;

/// Parse INI text. Never fails; anything that isn't a header or a
/// `key=value` line inside a section is dropped.
pub fn decode(text: &str) -> IniDocument {
    let mut doc = IniDocument::new();
    let mut current: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
            let name = line[1..line.len() - 1].to_string();
            doc.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let Some(section) = current.as_ref() else {
            continue;
        };
        let Some(eq) = line.find('=') else {
            continue;
        };
        let key = line[..eq].trim();
        if key.is_empty() {
            continue;
        }
        let mut value = line[eq + 1..].trim();
        if let Some(comment) = value.find(';') {
            value = value[..comment].trim();
        }

        doc.entry(section.clone())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    doc
}

/// Serialize a document. Values are written verbatim.
pub fn encode(doc: &IniDocument) -> String {
    let mut out = String::new();
    for (section, entries) in doc {
        out.push('[');
        out.push_str(section);
        out.push_str("]\n");
        for (key, value) in entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Read and decode a file. A missing file reads as an empty document.
pub fn read_ini_file(path: &Path) -> Result<IniDocument, String> {
    if !path.exists() {
        return Ok(IniDocument::new());
    }
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    Ok(decode(&text))
}

pub fn write_ini_file(path: &Path, doc: &IniDocument) -> Result<(), String> {
    std::fs::write(path, encode(doc)).map_err(|e| e.to_string())
}
