//! Prompt construction for the qualitative critique path.
//!
//! The critique is advisory text from a small generative model, separate
//! from the embedding pipeline. Inputs are truncated before prompting so the
//! combined prompt stays inside the model's context window.


/// System instructions sent with every critique request.
pub const SYSTEM_PROMPT: &str = "You are an AI assistant that helps optimize resumes for specific job descriptions. \
     Modify the given resume to better match the provided job description. \
     Focus on highlighting relevant skills and experiences that align with the job requirements. \
     Return only the modified resume in JSON format.";

/// Character budget for the resume portion of the prompt.
pub const RESUME_PROMPT_CHARS: usize = 3000;

/// Character budget for the job-description portion of the prompt.
pub const JD_PROMPT_CHARS: usize = 1200;

/// Builds the career-consultant prompt for a (resume, job description) pair.
pub fn consultant_prompt(resume_text: &str, jd_text: &str) -> String {
    let resume = truncate_chars(resume_text, RESUME_PROMPT_CHARS);
    let jd = truncate_chars(jd_text, JD_PROMPT_CHARS);

    format!(
        r#"Career Consultant: Help this person apply for a new job.

THEIR RESUME:
{resume}

TARGET JOB:
{jd}

Copy this EXACT format and fill in with their actual data:

## Career Transition Analysis
Name: [their name]
Target: [job title from JD]

## 1. Skill Translation
| Skill | Application to Target Job |
|:---|:---|
| Python | Automate inventory and ordering systems |
| Excel | Track costs and manage budgets |
| Data Analysis | Forecast demand and reduce waste |
| SQL | Manage operational databases |
| Automation | Streamline workflows |

(Replace with their actual skills and how each applies to THIS job)

## 2. Experience Reframing
Keep their original job title. Show how to describe it for the new role:
- Data Analyst at X Company: "Experience with data systems applies to operational management"

## 3. What to Add
- [Certification for target job]: Why needed
- [Skill to learn]: Why needed
- [Experience to gain]: How to get it

## 4. Keywords for ATS
- [word from JD]
- [word from JD]
- [word from JD]

## 5. Summary
[Name] is a [background]. [How skills transfer to new role].
"#
    )
}

/// Truncates to at most `max_chars` characters, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
