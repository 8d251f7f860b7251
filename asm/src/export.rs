use crate::error::Error;
use crate::memory::MemoryMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::Path;

/// Memory block data file of the MTech workshop item.
pub const DEFAULT_EXPORT_PATH: &str = "C:/Program Files (x86)/Steam/steamapps/workshop/content/387990/3100500975/memoryBlockData/data.json";

#[derive(Debug, Serialize)]
struct MemoryBlock {
    data: Vec<String>,
}

/// `{"data": ["0b..", ...]}`, indented by four spaces.
pub fn to_json(map: &MemoryMap) -> Result<String, Error> {
    let block = MemoryBlock {
        data: map.binary.iter().map(|word| format!("0b{}", word)).collect(),
    };
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    block.serialize(&mut ser)?;
    // serde_json only writes UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn export(map: &MemoryMap, path: &Path) -> Result<(), Error> {
    let json = to_json(map)?;
    std::fs::write(path, json).map_err(|e| Error::FileWrite(path.display().to_string(), e))?;
    tracing::info!(path = %path.display(), words = map.len(), "exported memory block");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use arch::InstructionSet;

    #[test]
    fn json_layout() {
        let map = compile("%1\n%10", &InstructionSet::onebpc());
        assert_eq!(
            to_json(&map).unwrap(),
            "{\n    \"data\": [\n        \"0b0000000001\",\n        \"0b0000000010\"\n    ]\n}"
        );
    }

    #[test]
    fn empty_map() {
        let map = compile("", &InstructionSet::onebpc());
        assert_eq!(to_json(&map).unwrap(), "{\n    \"data\": []\n}");
    }
}
