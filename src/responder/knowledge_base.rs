use std::collections::BTreeMap;

use anyhow::Result;

use super::Responder;

/// Built-in AMOS topics: (topic key, answer). Keys are lowercase.
const BUILTIN_TOPICS: &[(&str, &str)] = &[
    (
        "amos",
        "AMOS is the quantum knowledge base behind this chat. Ask me about qubits, \
         superposition, entanglement, decoherence, quantum gates or quantum computing.",
    ),
    (
        "quantum computing",
        "Quantum computing uses qubits, superposition and entanglement to explore many \
         computational paths at once. It shines on problems like factoring, search and \
         simulating molecules.",
    ),
    (
        "qubit",
        "A qubit is the basic unit of quantum information. Unlike a bit it can be in a \
         superposition of |0⟩ and |1⟩ until it is measured.",
    ),
    (
        "superposition",
        "Superposition means a quantum system exists in a combination of states at once. \
         Measurement collapses it to a single outcome with probabilities set by the amplitudes.",
    ),
    (
        "entanglement",
        "Entangled particles share one quantum state: measuring one instantly tells you \
         about the other, however far apart they are.",
    ),
    (
        "decoherence",
        "Decoherence is the leaking of quantum information into the environment. It is the \
         main reason qubits lose their state and why error correction matters.",
    ),
    (
        "quantum gate",
        "Quantum gates are reversible operations on qubits. Common ones are the Hadamard \
         gate (creates superposition), Pauli-X (bit flip) and CNOT (entangles two qubits).",
    ),
    (
        "quantum tunneling",
        "Quantum tunneling lets a particle cross an energy barrier it classically could not. \
         It powers tunnel diodes and scanning tunneling microscopes.",
    ),
    (
        "wave function",
        "The wave function describes the quantum state of a system. Its squared magnitude \
         gives the probability of each measurement outcome.",
    ),
];

/// Static question answering keyed by topic string.
///
/// Lookup order: exact topic match, then the longest topic contained in the
/// prompt, then a default answer listing what is known.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    topics: BTreeMap<String, String>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        let topics = BUILTIN_TOPICS
            .iter()
            .map(|(topic, answer)| (topic.to_string(), answer.to_string()))
            .collect();
        Self { topics }
    }
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace topics; keys are normalised the same way prompts are
    pub fn with_topics<I, K, V>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (topic, answer) in extra {
            let key = normalize(topic.as_ref());
            if key.is_empty() {
                tracing::warn!("ignoring knowledge base topic with an empty name");
                continue;
            }
            self.topics.insert(key, answer.into());
        }
        self
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Find the answer for a prompt, if any topic applies
    pub fn lookup(&self, prompt: &str) -> Option<&str> {
        let key = normalize(prompt);
        if key.is_empty() {
            return None;
        }
        if let Some(answer) = self.topics.get(&key) {
            return Some(answer);
        }

        self.topics
            .iter()
            .filter(|(topic, _)| key.contains(topic.as_str()))
            .max_by_key(|(topic, _)| topic.len())
            .map(|(_, answer)| answer.as_str())
    }

    fn default_answer(&self) -> String {
        let known: Vec<&str> = self.topics().collect();
        format!(
            "I don't have that in my quantum knowledge base yet. Try asking about: {}.",
            known.join(", ")
        )
    }
}

impl Responder for KnowledgeBase {
    fn respond(&mut self, prompt: &str) -> Result<String> {
        Ok(match self.lookup(prompt) {
            Some(answer) => answer.to_string(),
            None => self.default_answer(),
        })
    }
}

/// Lowercase, trim, and drop trailing punctuation
fn normalize(text: &str) -> String {
    text.trim().trim_end_matches(['?', '!', '.']).trim().to_lowercase()
}
