//! Metadata query routing: suitable inputs go to the SQL agent (plus
//! enrichment), everything else gets a generic assistant answer.

use copilot_common::{ClassificationVerdict, UserInput};
use copilot_llm::audit::complete_audited;
use copilot_llm::prompt::fallback_prompt;
use copilot_llm::LlmError;
use tracing::{info, warn};

use crate::context::ServiceContext;
use crate::enrich::enrich;
use crate::presentation::{Presentation, DB_SUBHEADING, SUITABLE_BANNER, UNSUITABLE_BANNER};

/// Appends the routed output to `out`.
///
/// SQL-agent failures become an error block. A failure of the generic chat
/// completion is returned to the caller.
pub async fn route(
    ctx: &ServiceContext,
    input: &UserInput,
    verdict: &ClassificationVerdict,
    out: &mut Presentation,
) -> Result<(), LlmError> {
    if verdict.is_suitable() {
        out.success(SUITABLE_BANNER);
        query_db(ctx, input, out, true).await;
        return Ok(());
    }

    out.info(UNSUITABLE_BANNER);
    let req = fallback_prompt(input.as_str()).into_request();
    let generic = complete_audited(ctx.llm.as_ref(), req, "fallback").await?;
    out.markdown(generic.content.trim());

    if ctx.options.query_db_on_fallback {
        // Negative verdicts still hit the database: two LLM round-trips plus the agent
        warn!("Negative verdict: running SQL agent in addition to generic answer");
        query_db(ctx, input, out, false).await;
    }
    Ok(())
}

/// Runs the SQL agent on the raw input. Enrichment only follows on the
/// suitable path.
async fn query_db(ctx: &ServiceContext, input: &UserInput, out: &mut Presentation, with_enrichment: bool) {
    match ctx.sql_agent.run(input.as_str()).await {
        Ok(answer) => {
            out.subheading(DB_SUBHEADING);
            out.markdown(answer.as_str());

            if with_enrichment {
                let enrichment = enrich(&answer, ctx.resolver.as_ref(), ctx.histology.as_ref()).await;
                if let Some(line) = enrichment.summary_line() {
                    out.markdown(line);
                }
                info!(enrichment = ?enrichment, "Enrichment finished");
            }
        }
        Err(e) => {
            warn!(error = %e, "SQL agent failed");
            out.error(format!("Failed to process database query: {e}"));
        }
    }
}
