use crate::docs::types::Cdp;

use super::query::QueryType;

pub const PROMPT_PREFIX: &str = "Answer the following question about ";

pub const COMPARISON_INSTRUCTION: &str =
    "\n\nCompare different CDP platforms, highlighting their similarities and differences.";

pub const ADVANCED_INSTRUCTION: &str =
    "\n\nProvide detailed technical information and step-by-step instructions.";

pub const FORMAT_INSTRUCTION: &str =
    "\n\nFormat your answer in a clear, structured way. Include code examples where appropriate.";

pub const CONTEXT_HEADER: &str = "Relevant information:\n\n";

/// The question prompt sent to the model, before any context is attached.
pub fn build_prompt(query: &str, cdp: Option<&str>, query_type: QueryType) -> String {
    let mut prompt = String::from(PROMPT_PREFIX);
    match cdp {
        Some(cdp) => prompt.push_str(&format!("the {} CDP platform: {}", cdp, query)),
        None => prompt.push_str(&format!("CDP platforms: {}", query)),
    }

    match query_type {
        QueryType::Comparison => prompt.push_str(COMPARISON_INSTRUCTION),
        QueryType::Advanced => prompt.push_str(ADVANCED_INSTRUCTION),
        QueryType::HowTo => {}
    }

    prompt.push_str(FORMAT_INSTRUCTION);
    prompt
}

/// Canned overview used when retrieval finds nothing for a query naming `cdp`.
pub fn fallback_context(cdp: Cdp) -> &'static str {
    match cdp {
        Cdp::Segment => SEGMENT_OVERVIEW,
        Cdp::Mparticle => MPARTICLE_OVERVIEW,
        Cdp::Lytics => LYTICS_OVERVIEW,
        Cdp::Zeotap => ZEOTAP_OVERVIEW,
    }
}

const SEGMENT_OVERVIEW: &str = "\
Segment is a Customer Data Platform (CDP) that allows you to collect, clean, and control customer data.
It provides tools for data collection, identity resolution, audience building, and data activation.
Key features include:
- Website and app tracking
- Server-side event collection
- Data warehouse integration
- Identity resolution
- Audience building
- Destination connections to hundreds of tools
";

const MPARTICLE_OVERVIEW: &str = "\
mParticle is a Customer Data Platform (CDP) focused on mobile and web data collection.
It specializes in real-time data collection, identity management, and audience creation.
Key features include:
- SDK-based data collection
- Server-side event tracking
- Identity resolution and management
- Audience building and segmentation
- Machine learning-powered insights
- Integration with hundreds of destinations
";

const LYTICS_OVERVIEW: &str = "\
Lytics is a Customer Data Platform (CDP) focused on predictive analytics and personalization.
It specializes in behavioral scoring, content affinity, and predictive recommendations.
Key features include:
- Data collection from multiple sources
- Machine learning-based user scoring
- Content and product affinity modeling
- Predictive audience building
- Real-time personalization
- Integration with marketing and analytics tools
";

const ZEOTAP_OVERVIEW: &str = "\
Zeotap is a Customer Data Platform (CDP) specializing in identity resolution and data enrichment.
It focuses on connecting first-party data with third-party data sources for enhanced profiles.
Key features include:
- Unified customer view
- Identity resolution across devices
- Data enrichment with third-party sources
- Predictive analytics and modeling
- Audience segmentation and targeting
- Privacy-compliant data management
";
