//! Bundled example logs

/// Generic bracket-marker log with one nested block and one error
pub const EXAMPLE_LOG: &str = "[START] Agent task started
[THINKING] Analyze the request: find errors in the Python files
[ACTION] search_files: search Python files containing 'error'
[RESULT] Found 3 relevant files
[DECISION] Pick the most relevant file for analysis
[ACTION] read_file: read error_handler.py
[RESULT] File read successfully
[THINKING] Found a potential null pointer dereference
[ACTION] fix_error: fix the null pointer dereference
[ERROR] Fix failed: insufficient permissions
[ACTION] request_permission: request write permission
[RESULT] Permission granted
[ACTION] fix_error: retry the fix
[RESULT] Fix succeeded
[END] Task complete";

/// ReAct-style chain output
pub const LANGCHAIN_LOG: &str = "> Entering new AgentExecutor chain...
Thought: I need to look up the population of Paris
Action: search[population of Paris]
Observation: Paris has about 2.1 million inhabitants
Thought: I now know the final answer
Final Answer: About 2.1 million people live in Paris
> Finished chain.";

/// Multi-agent conversation with a code execution round
pub const AUTOGEN_LOG: &str = "user_proxy (to assistant):
Plot the stock price of NVDA for the last month.
assistant (to user_proxy):
Here is a script that downloads the prices and plots them.
EXECUTING CODE BLOCK: 0 (inferred language is python)...
user_proxy (to assistant):
exitcode: 0 (execution succeeded)
TERMINATE";

/// Task crew with a tool call
pub const CREWAI_LOG: &str = "Working Agent: Senior Research Analyst
Starting Task: Summarize recent developments in battery chemistry
Using tool: web_search
Task Output: Solid-state cells moved closer to production this year";

/// Bundled sample for a framework name, if there is one
pub fn sample_for(framework: &str) -> Option<&'static str> {
    match framework {
        "generic" => Some(EXAMPLE_LOG),
        "langchain" => Some(LANGCHAIN_LOG),
        "autogen" => Some(AUTOGEN_LOG),
        "crewai" => Some(CREWAI_LOG),
        _ => None,
    }
}
