// All LLM prompt constants for the enrichment module.
// Cross-cutting fragments live in llm_client::prompts.

/// System prompt for one-word intent classification.
pub const INTENT_SYSTEM: &str = "You are an expert in search intent analysis. \
    You MUST reply with exactly one lowercase word and nothing else.";

/// Intent classification prompt. Replace `{keyword}` before sending.
pub const INTENT_PROMPT_TEMPLATE: &str = r#"Classify the search intent for this keyword: "{keyword}"

Choose ONE of:
- informational (learning, how-to, what is)
- transactional (buy, purchase, download)
- commercial (best, review, compare, vs)
- navigational (brand name, specific site)

Reply with only one word."#;

/// Keyword clustering prompt. Replace `{keywords}` (newline-separated list).
pub const CLUSTER_PROMPT_TEMPLATE: &str = r#"Group these keywords into semantic clusters:

{keywords}

Return JSON format:
{
  "cluster_name_1": ["keyword1", "keyword2"],
  "cluster_name_2": ["keyword3", "keyword4"]
}"#;

/// System prompt for content brief generation.
pub const BRIEF_SYSTEM: &str = "You are a senior SEO content strategist. \
    Produce practical, specific content briefs a writer can execute without follow-up questions.";

/// Content brief prompt. Replace `{primary_keyword}`, `{related_keywords}`, `{intent}`.
pub const BRIEF_PROMPT_TEMPLATE: &str = r#"Create a comprehensive content brief for:

Primary Keyword: {primary_keyword}
Related Keywords: {related_keywords}
Intent: {intent}

Include:
1. Target audience
2. Content angle/hook
3. Key points to cover (outline)
4. Recommended word count
5. Content type (blog, guide, comparison, etc.)
6. SEO optimizations needed"#;

/// System prompt for article generation.
pub const ARTICLE_SYSTEM: &str = "You are an expert SEO content writer. \
    Write grounded, useful long-form content in clean markdown. \
    Never fabricate statistics or quote nonexistent sources.";

/// Article generation prompt. Replace `{content_kind}`, `{keyword}`, `{brief}`.
pub const ARTICLE_PROMPT_TEMPLATE: &str = r#"Write a comprehensive, SEO-optimized {content_kind} about: {keyword}

Content Brief:
{brief}

Requirements:
- 1500-2000 words
- Natural keyword usage
- Clear H2/H3 structure
- Include actionable tips
- Conversational tone
- Include FAQs section

Format as markdown. Start with a single `#` title line."#;

/// Meta description prompt. Replace `{title}`, `{keyword}`, `{summary}`.
pub const META_DESCRIPTION_PROMPT_TEMPLATE: &str = r#"Generate a compelling meta description (155-160 characters):

Title: {title}
Target Keyword: {keyword}
Summary: {summary}

Requirements:
- Include target keyword naturally
- Create urgency or curiosity
- Include a call-to-action
- Exactly 155-160 characters

Reply with the meta description only, no quotes."#;

/// Report summary prompt. Replace `{metrics_json}`, `{period}`.
pub const REPORT_SUMMARY_PROMPT_TEMPLATE: &str = r#"Analyze these SEO metrics for {period}:

{metrics_json}

Provide:
1. A 2-3 sentence executive summary
2. 3-5 actionable recommendations

Format as JSON:
{
  "summary": "...",
  "recommendations": ["...", "..."]
}"#;

/// Outreach email prompt. Replace `{target_domain}`, `{our_domain}`, `{credits}`.
pub const OUTREACH_PROMPT_TEMPLATE: &str = r#"Write a friendly outreach email to {target_domain} offering them {credits} free credits on our SEO automation platform in exchange for a backlink.

Context:
- Our domain: {our_domain}
- Their domain: {target_domain}
- Offer: ${credits} worth of free SEO automation credits
- Call-to-action: Include a link to our content

Keep it:
- Short (under 150 words)
- Friendly and authentic
- Focused on value exchange
- Non-spammy

Reply with the email body only."#;
