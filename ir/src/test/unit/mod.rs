mod equal;
mod to_imm;
