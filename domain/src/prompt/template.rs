//! Prompt templates for the council rounds

use crate::agent::value_objects::{AgentId, ChunkSequence, Decision, Opinion};
use crate::core::question::OptionSet;
use crate::session::Message;

/// Named system prompts, with the parameters each one needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateName<'a> {
    /// Hypothesis from the agent's own chunk
    Round1,
    /// Pick peers to follow up on; lists the selectable peer ids
    Round2 { peers: &'a [AgentId] },
    /// Judge one peer's chunk
    Round3 { target: AgentId },
    /// Choose among the deepest opinions
    FinalRound,
    /// Adjudicate between tied answers
    TieBreak { candidates: &'a [String] },
}

/// Templates for generating prompts at each round
pub struct PromptTemplate;

impl PromptTemplate {
    /// Render a system prompt by name
    pub fn system(name: TemplateName<'_>) -> String {
        match name {
            TemplateName::Round1 => r#"You are one of several agents, each holding a different chunk of a long document.
Read your chunk and find the evidence in it that bears on the question.
Answer with the option your evidence supports best. If your chunk says nothing relevant, say so in the evidence and give your best guess.
Respond with a JSON object only:
{"evidence": "<quoted or summarized evidence from your chunk>", "answer": "<option label>"}"#
                .to_string(),

            TemplateName::Round2 { peers } => {
                let ids: Vec<String> = peers.iter().map(|id| id.to_string()).collect();
                format!(
                    r#"You are one of several agents, each holding a different chunk of a long document.
You will see your own evidence and answer, followed by those of the other agents.
Decide which other agents hold evidence worth reading in full to answer the question better: evidence that fills a gap in yours, contradicts it, or points to a different option.
Selectable agents: [{}]. Choose none if nobody adds anything.
Respond with a JSON object only:
{{"id": "<comma-separated agent ids, or empty>", "explanation": "<why these agents>"}}"#,
                    ids.join(", ")
                )
            }

            TemplateName::Round3 { target } => format!(
                r#"You previously formed evidence and an answer for a question.
You are now given the document chunk held by Agent {}.
Judge whether this chunk adds information that changes or strengthens your evidence.
If it adds nothing, mark it useless. If it helps, merge it into updated evidence and give the answer that evidence supports.
Respond with a JSON object only:
{{"utility": "useful" | "useless", "fact": "<updated evidence, if useful>", "conclusion": "<option label, if useful>"}}"#,
                target
            ),

            TemplateName::FinalRound => r#"You have explored several orders of reading other agents' document chunks.
Each opinion below records the chunks read (by agent id, in order), the evidence gathered, and the answer it led to.
Weigh the opinions and choose one final answer. If every opinion is inconclusive, answer "None".
Respond with a JSON object only:
{"result": "<option label or None>"}"#
                .to_string(),

            TemplateName::TieBreak { candidates } => format!(
                r#"A council of agents voted on a multiple-choice question and the vote is tied between: {}.
You will see every agent's final opinions and vote.
Choose the single best-supported answer among the tied candidates.
Respond with a JSON object only:
{{"result": "<one of the tied candidates>"}}"#,
                candidates.join(", ")
            ),
        }
    }

    fn question_header(claim: &str, options: &OptionSet) -> String {
        format!("question: {}\noptions:\n{}\n", claim, options)
    }

    /// Round 1 prompt: the agent's own (already truncated) chunk
    pub fn confirm(claim: &str, options: &OptionSet, chunk: &str) -> Vec<Message> {
        let system = Self::system(TemplateName::Round1);
        let user = format!(
            "{}document chunk:\n{}\n\n{}",
            Self::question_header(claim, options),
            chunk,
            system
        );
        vec![Message::system(system), Message::user(user)]
    }

    /// Round 2 prompt: own opinion plus every peer's published opinion
    pub fn exchange(
        claim: &str,
        options: &OptionSet,
        own: &Opinion,
        peers: &[(AgentId, &Opinion)],
    ) -> Vec<Message> {
        let peer_ids: Vec<AgentId> = peers.iter().map(|(id, _)| *id).collect();
        let mut user = Self::question_header(claim, options);
        user.push_str(&format!(
            "Your evidence: {}\nYour answer: {}\n",
            own.evidence, own.conclusion
        ));
        for (id, opinion) in peers {
            user.push_str(&format!(
                "\n{sep}\nAgent {}:\nevidence: {}\nanswer: {}\n{sep}\n",
                id,
                opinion.evidence,
                opinion.conclusion,
                sep = "#".repeat(20)
            ));
        }
        vec![
            Message::system(Self::system(TemplateName::Round2 { peers: &peer_ids })),
            Message::user(user),
        ]
    }

    /// Round 3 prompt: prior opinion plus one peer's (already truncated) chunk
    pub fn refine(
        claim: &str,
        options: &OptionSet,
        prior: &Opinion,
        target: AgentId,
        chunk: &str,
    ) -> Vec<Message> {
        let user = format!(
            "{}prev evidence: {}\nprev answer: {}\nnew document chunk:\n{}",
            Self::question_header(claim, options),
            prior.evidence,
            prior.conclusion,
            chunk
        );
        vec![
            Message::system(Self::system(TemplateName::Round3 { target })),
            Message::user(user),
        ]
    }

    /// Final round prompt: the agent's deepest opinions as labeled alternatives
    pub fn final_round(
        claim: &str,
        options: &OptionSet,
        opinions: &[(&ChunkSequence, &Opinion)],
    ) -> Vec<Message> {
        let mut user = Self::question_header(claim, options);
        user.push_str("your opinions:\n");
        user.push_str(&Self::labeled_opinions(opinions));
        vec![
            Message::system(Self::system(TemplateName::FinalRound)),
            Message::user(user),
        ]
    }

    /// Tie-break prompt: tied candidates plus every agent's opinions and vote
    pub fn tie_break(
        claim: &str,
        options: &OptionSet,
        candidates: &[String],
        agents: &[(AgentId, &Decision, Vec<(&ChunkSequence, &Opinion)>)],
    ) -> Vec<Message> {
        let mut user = Self::question_header(claim, options);
        user.push_str(&format!("tied candidates: {}\n", candidates.join(", ")));
        for (id, decision, opinions) in agents {
            user.push_str(&format!(
                "\n--- Agent {} (voted {}) ---\n{}",
                id,
                decision,
                Self::labeled_opinions(opinions)
            ));
        }
        vec![
            Message::system(Self::system(TemplateName::TieBreak { candidates })),
            Message::user(user),
        ]
    }

    fn labeled_opinions(opinions: &[(&ChunkSequence, &Opinion)]) -> String {
        opinions
            .iter()
            .enumerate()
            .map(|(i, (sequence, opinion))| {
                format!(
                    "<opinion{i}>Chunks {}: evidence: {} | answer: {}</opinion{i}>\n",
                    sequence, opinion.evidence, opinion.conclusion
                )
            })
            .collect()
    }
}
