mod json_store;
mod setup_flow;
