// Scope matching LLM prompt templates.

pub const SCOPE_MATCH_SYSTEM: &str = "\
You are an experienced academic editor who advises authors on where to submit. \
You compare a manuscript against journal scope statements and judge topical fit only. \
Only use journal ids that appear in the provided catalog.";

pub const SCOPE_MATCH_PROMPT: &str = r#"Rate how well the manuscript below fits the scope of each journal in the catalog.

MANUSCRIPT TITLE:
{title}

MANUSCRIPT ABSTRACT:
{abstract}

JOURNAL CATALOG (JSON):
{journals}

OUTPUT SCHEMA (return exactly this structure):
{
  "matches": [
    {
      "journal_id": "string (an id from the catalog)",
      "score": number (0-100, 100 = perfect topical fit),
      "explanation": "string (why the manuscript does or does not fit this journal's scope)",
      "considerations": "string (practical notes for the author: scope gaps, audience, framing)"
    }
  ]
}

RULES:
1. Include each catalog journal at most once.
2. Judge fit against the journal's scope and subjects, not its prestige.
3. Score unrelated journals low rather than omitting reasoning.
4. Return ONLY the JSON object and nothing else, no code fences."#;
