mod clauses;
mod export;
mod import;
