//! Cadence source of the set query.

use shared::{domain::SetId, protocol::ScriptRequest};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::cadence::CadenceValue;

const CONTRACT_PLACEHOLDER: &str = "0xTOPSHOTADDRESS";

/// Reads one set (name, lock flag, ordered editions with retirement and mint
/// counts) plus the full play catalog. Takes the set id as its only argument.
const SET_QUERY_TEMPLATE: &str = r#"import TopShot from 0xTOPSHOTADDRESS

access(all) struct Edition {
    access(all) let playID: UInt32
    access(all) let retired: Bool
    access(all) let momentCount: UInt32
    access(all) let playOrder: UInt32

    init(playID: UInt32, retired: Bool, momentCount: UInt32, playOrder: UInt32) {
        self.playID = playID
        self.retired = retired
        self.momentCount = momentCount
        self.playOrder = playOrder
    }
}

access(all) struct SetSummary {
    access(all) let id: UInt32
    access(all) let setName: String
    access(all) let playIDs: [UInt32]
    access(all) let editions: [Edition]
    access(all) let locked: Bool

    init(id: UInt32, setName: String) {
        self.id = id
        self.setName = setName
        self.playIDs = TopShot.getPlaysInSet(setID: id)!
        self.locked = TopShot.isSetLocked(setID: id)!

        var editions: [Edition] = []
        var playOrder: UInt32 = 1
        for playID in self.playIDs {
            let retired = TopShot.isEditionRetired(setID: id, playID: playID)!
            let momentCount = TopShot.getNumMomentsInEdition(setID: id, playID: playID)!
            editions.append(Edition(playID: playID, retired: retired, momentCount: momentCount, playOrder: playOrder))
            playOrder = playOrder + 1
        }
        self.editions = editions
    }
}

access(all) struct TopshotSet {
    access(all) let set: SetSummary
    access(all) let plays: [TopShot.Play]

    init(setID: UInt32) {
        self.set = SetSummary(id: setID, setName: TopShot.getSetName(setID: setID)!)
        self.plays = TopShot.getAllPlays()
    }
}

access(all) fun main(setID: UInt32): TopshotSet {
    return TopshotSet(setID: setID)
}
"#;

/// Set query source with the contract import bound to `contract`.
pub fn set_query_source(contract: &str) -> String {
    SET_QUERY_TEMPLATE.replace(CONTRACT_PLACEHOLDER, contract)
}

pub fn set_query_arguments(set_id: SetId) -> Vec<CadenceValue> {
    vec![CadenceValue::uint32(set_id.0)]
}

/// Wire body for `POST /v1/scripts`.
pub fn encode_script_request(source: &str, arguments: &[CadenceValue]) -> ScriptRequest {
    ScriptRequest {
        script: STANDARD.encode(source.as_bytes()),
        arguments: arguments
            .iter()
            .map(|argument| STANDARD.encode(argument.to_json().to_string().as_bytes()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_imports_configured_contract() {
        let source = set_query_source("0x0b2a3299cc857e29");
        assert!(source.starts_with("import TopShot from 0x0b2a3299cc857e29\n"));
        assert!(!source.contains(CONTRACT_PLACEHOLDER));
        assert!(source.contains("access(all) fun main(setID: UInt32): TopshotSet"));
    }

    #[test]
    fn request_encodes_script_and_uint32_argument() {
        let request = encode_script_request("pub fun main() {}", &set_query_arguments(SetId(42)));

        let script = STANDARD.decode(&request.script).expect("script base64");
        assert_eq!(script, b"pub fun main() {}");

        assert_eq!(request.arguments.len(), 1);
        let argument = STANDARD.decode(&request.arguments[0]).expect("argument base64");
        let argument: serde_json::Value = serde_json::from_slice(&argument).expect("json");
        assert_eq!(
            argument,
            serde_json::json!({ "type": "UInt32", "value": "42" })
        );
    }
}
