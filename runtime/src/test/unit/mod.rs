mod interpreter;
mod plan;
