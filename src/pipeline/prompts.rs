//! Prompt templates for the summarization pipeline.

/// Per-page summary prompt. The user query is deliberately not included;
/// summaries stay faithful to the page and the final combine step brings
/// the query back in.
pub fn single_webpage_summary(context: &str) -> String {
    format!("Summarize the following document: {context}")
}

/// Query-rewrite prompt. The model must answer with a bare JSON object
/// holding exactly one key, `query`.
pub fn search_query_gen(user_query: &str) -> String {
    format!(
        "You are extremely good at context understanding and generating web search queries based on the understanding.\n\
         You are given a user query. Understand what the user wants and generate a perfect, extremely-well-structured search query that will help the user find what he/she needs.\n\
         \n\
         Generate just the query in JSON format. No extra text. Keys to include: \"query\".\n\
         \n\
         The user query is following:\n\
         {user_query}\n"
    )
}

/// Combine prompt. Whether to answer the question or distill a thematic
/// summary is left to the model to infer from the query's phrasing.
pub fn final_summary(query: &str, summaries: &str) -> String {
    format!(
        "User wants to know about {query}.\n\
         And The following is a set of summaries on this topic:\n\
         {summaries}\n\
         \n\
         Now, if the query is an asked question then: Generate only an answer to the original query with some useful additional information.\n\
         Otherwise: Take these and distill it into a final, consolidated summary of the main themes.\n"
    )
}
