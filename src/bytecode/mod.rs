pub mod disasm;
pub mod spec;

pub use disasm::{Listing, disassemble};
pub use spec::{
    Bytecode, BytecodeError, Instruction, Instructions, JUMP_INSTRUCTION_LEN, JUMP_OPERAND_WIDTH,
    Opcode, PLACEHOLDER_TAG, read_operand, write_operand,
};
