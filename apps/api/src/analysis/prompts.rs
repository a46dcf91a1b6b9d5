// Prompt for the resume-vs-job-description evaluation call.
// The JSON schema block is a contract with the model: the response must be a
// single object with exactly these five top-level categories. Only the top
// level is validated on the way back in.

/// Placeholders `{resume_text}` and `{job_description}` are substituted with
/// the already-truncated inputs.
pub const ANALYSIS_PROMPT: &str = r#"
As the Head of Talent Acquisition, **conduct a highly critical and objective analysis** of this resume against the job description using the following categories.
Provide a **concise and precise ATS analysis** with **strict adherence to the JSON format** below.
**No extra text or explanations are permitted** before, within, or after the JSON.

**Categories:**

1. **Searchability:**
    - **Meticulously** evaluate resume formatting for ATS compatibility.
    - **Thoroughly** assess presence of essential details: contact, job titles, relevant sections.
    - **Precisely** compare resume and job description job titles for accuracy and relevance.

2. **Hard Skills:**
    - **Carefully** analyze and **match** resume skills with job description requirements.
    - **Determine** the level of technical proficiency, identifying **specific strengths and weaknesses.**
    - **Provide actionable recommendations** for skill gaps and improvements.

3. **Soft Skills:**
    - **Evaluate** how effectively the resume demonstrates soft skills **crucial** for the job.
    - **Assess** leadership, interpersonal, and communication skills with **rigor.**
    - **Offer concrete recommendations** for soft skill enhancement.

4. **Recruiter Tips:**
    - **Accurately** assess resume suitability for the **appropriate job level** (entry, mid, senior).
    - **Scrutinize** the resume for **quantifiable achievements** (e.g., sales, leads, metrics).
    - **Evaluate** the resume's **tone and professionalism** in relation to the target role.
    - **Analyze** and **recommend** inclusion/exclusion of online presence or portfolio links.

5. **Overall:**
    - **Assign a precise score (out of 100)** reflecting resume alignment with the job description.
    - **What is the candidate applying for?** Provide a clear explanation of the job title.
    - **Provide a clear and decisive shortlist recommendation** with **strong justification.**
    - **Identify critical improvements** essential for increasing selection chances.
    - **Highlight the candidate's most compelling strengths** for the role.

**JSON Format (Strictly Enforced):**

{
    "searchability": {
        "score": <number 0-100>,
        "contact_info": {
            "present": boolean,
            "missing": ["<string>"]
        },
        "sections": {
            "has_summary": boolean,
            "has_proper_headings": boolean,
            "properly_formatted_dates": boolean
        },
        "job_title_match": {
            "score": <number 0-100>,
            "explanation": "<string>"
        },
        "recommendations": ["<string>"]
    },
    "hard_skills": {
        "score": <number 0-100>,
        "matched_skills": ["<string>"],
        "missing_skills": ["<string>"],
        "technical_proficiency": {
            "score": <number 0-100>,
            "strengths": ["<string>"],
            "gaps": ["<string>"]
        },
        "recommendations": ["<string>"]
    },
    "soft_skills": {
        "score": <number 0-100>,
        "matched_skills": ["<string>"],
        "missing_skills": ["<string>"],
        "leadership_indicators": ["<string>"],
        "recommendations": ["<string>"]
    },
    "recruiter_tips": {
        "score": <number 0-100>,
        "job_level_match": {
            "assessment": "<string>",
            "recommendation": "<string>"
        },
        "measurable_results": {
            "present": ["<string>"],
            "missing": ["<string>"]
        },
        "resume_tone": {
            "assessment": "<string>",
            "improvements": ["<string>"]
        },
        "web_presence": {
            "mentioned": ["<string>"],
            "recommended": ["<string>"]
        }
    },
    "overall": {
        "total_score": <number 0-100>,
        "applying_for": {
            "job_title": "<string>",
            "explanation": "<string>"
        },
        "shortlist_recommendation": {
            "decision": "<string>",
            "explanation": "<string>"
        },
        "critical_improvements": ["<string>"],
        "key_strengths": ["<string>"]
    }
}

Resume:
{resume_text}

Job Description:
{job_description}
"#;

pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    ANALYSIS_PROMPT
        .replace("{resume_text}", resume_text)
        .replace("{job_description}", job_description)
}
