use crate::{error::Error, vm};

pub type FallableAction = Result<(), Error>;
pub type FallableInstructions = Result<Vec<vm::VMInstruction>, Error>;
