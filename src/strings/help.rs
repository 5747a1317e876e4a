//! # Help Text
//!
//! Command reference displayed by `/help`.

pub const MAIN: &str = concat!(
    "AGENT & TASK COMMANDS:\n",
    "  /help                  - Show this help message.\n",
    "  /agent list            - List all available AI agents.\n",
    "  /agent <name>          - Switch to a different AI agent (e.g., /agent Lyra).\n",
    "  /note <agent> <text>   - Add a strategic note to an agent's memory.\n",
    "  /tasks                 - List all project tasks and their status.\n",
    "  /exec <task_id>        - Manually execute a specific project task.\n",
    "  /orchestrate <goal>    - Have Andoy create and execute a full project plan.\n",
    "  /innovate <desc>       - Have Andoy orchestrate a plan that creates new files.\n",
    "  /research_and_write <topic> - Have agents research and write a doc file.\n",
    "  /develop_feature <desc> - Have agents design, code, and document a feature.\n",
    "  /spec_flow <topic>     - Orchestrate a handoff to create spec files (YAML, JSON, MD).\n",
    "  /ask <question>        - Ask the active AI agent a general question.\n",
    "  /docs <url> <question> - Ask an agent a question about API documentation at <url>.\n",
    "  /search <query>        - Answer a question from the files in the workspace.\n",
    "  /cli <gemini|openai> <prompt> - Send a raw prompt to a provider terminal.\n",
    "\n",
    "SCHEDULER:\n",
    "  /schedule \"<cmd>\" at <YYYY-MM-DDTHH:MM:SS> - Schedule a command for future execution.\n",
    "  /schedules             - List scheduled commands.\n",
    "  /cancel <id>           - Cancel a pending scheduled command.\n",
    "\n",
    "FILE SYSTEM COMMANDS:\n",
    "  /ls [path]             - List files in the current or specified directory.\n",
    "  /cat <file>            - Display the contents of a file.\n",
    "  /touch <file>          - Create an empty file.\n",
    "  /mkdir <dir>           - Create a new directory.\n",
    "  /edit <file> \"content\" - Write or overwrite a file with new content.\n",
    "  /rm <path>             - Remove a file or directory.\n",
    "  /tree [path]           - Show the directory tree.\n",
    "  /zip <dir>             - Archive a directory.\n",
    "  /unzip <file.zip>      - Extract an archive next to itself.\n",
    "\n",
    "SETTINGS:\n",
    "  /key <api-key>         - Set and validate the OpenAI API key.\n",
    "  /instructions [orchestrator|supervisor] [text] - Show or update custom instructions.\n",
    "\n",
    "CONSOLE & LOGGING:\n",
    "  /log <message>         - Save a message to the persistent logbook.\n",
    "  /history               - Display all messages from the logbook.\n",
    "  /clear                 - Clear the console history."
);

pub const OPENAI_CLI: &str = concat!(
    "OpenAI CLI Help:\n",
    "- This terminal is connected to the OpenAI API (model: gpt-4o-mini).\n",
    "- A valid API key must be configured with /key to use this feature.\n",
    "- Enter any prompt to interact with the model.\n",
    "- Example: \"Write a small python function to reverse a string\""
);

pub const GEMINI_CLI: &str = concat!(
    "Gemini CLI Help:\n",
    "- This terminal is connected to Google Gemini.\n",
    "- Enter any prompt to interact with the model.\n",
    "- Example: \"Explain the borrow checker in two sentences\""
);
