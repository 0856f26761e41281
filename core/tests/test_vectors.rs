//! Verify the accumulators, encoder and verdict against JSON test vectors
//! stored in `test-vectors/`.

use requests_core::{ByteAccumulator, Client, HeaderCollector, UreqEngine, Verdict};

fn load(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap()
}

fn bytes(value: &serde_json::Value) -> Vec<u8> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b.as_u64().unwrap() as u8)
        .collect()
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

#[test]
fn encode_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/encode.json"));
    let client = Client::new(UreqEngine::default());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let pairs: Vec<&str> = case["pairs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_str().unwrap())
            .collect();

        let encoded = client.encode_key_values(&pairs);
        assert_eq!(encoded.as_deref(), case["expected"].as_str(), "{name}");
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

#[test]
fn verdict_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/verdict.json"));

    for case in vectors["cases"].as_array().unwrap() {
        let status = case["status"].as_u64().unwrap() as u16;
        let expected = if case["ok"].as_bool().unwrap() {
            Verdict::Ok
        } else {
            Verdict::NotOk
        };
        assert_eq!(Verdict::from_status(status), expected, "status {status}");
    }
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

#[test]
fn header_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/headers.json"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut headers = HeaderCollector::new();
        for line in case["delivered"].as_array().unwrap() {
            headers.collect(line.as_str().unwrap().as_bytes()).unwrap();
        }

        let stored: Vec<&str> = headers.lines().iter().map(|h| h.to_str().unwrap()).collect();
        let expected: Vec<&str> = case["stored"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l.as_str().unwrap())
            .collect();
        assert_eq!(stored, expected, "{name}: stored lines");

        for (key, value) in case["lookups"].as_object().unwrap() {
            assert_eq!(headers.get(key), value.as_str(), "{name}: lookup {key}");
        }
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

#[test]
fn body_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/body.json"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut body = ByteAccumulator::new();
        for chunk in case["chunks"].as_array().unwrap() {
            body.append(&bytes(chunk)).unwrap();
        }

        let expected = bytes(&case["expected"]);
        assert_eq!(body.as_bytes(), &expected[..], "{name}");
        assert_eq!(body.len(), expected.len(), "{name}: length");
        assert_eq!(body.as_bytes_with_nul().last(), Some(&0), "{name}: terminator");
    }
}
