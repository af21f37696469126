// Execution engine for AnnoyScript

use crate::config::MachineConfig;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::io::{InputSource, ReaderInput};
use crate::memory::{tape::Tape, MachineState};
use crate::parser::ast::{Block, BlockKind, Item, NodeId, Program};
use crate::snapshot::{ExecutionPoint, Snapshot, SnapshotManager, Transcript};
use rustc_hash::FxHashMap;
use std::io::{self, Write};
use tracing::{debug, trace};

/// The tape machine that executes a parsed program
pub struct Interpreter {
    /// Parsed program; taken out temporarily while `run` walks it
    program: Program,

    config: MachineConfig,

    /// Tape, pointer and instruction counter
    pub(crate) state: MachineState,

    /// Source for `,`
    pub(crate) input: Box<dyn InputSource>,

    /// Sink for `.`
    pub(crate) output: Box<dyn Write>,

    /// Everything written by `.`, kept for the viewer and for tests
    pub(crate) transcript: Transcript,

    /// Executions per block id
    block_hits: FxHashMap<NodeId, u64>,

    /// Block that finished most recently (or the one restored from history)
    current_point: Option<ExecutionPoint>,

    /// Snapshot manager for reverse execution; `None` when history is off
    snapshot_manager: Option<SnapshotManager>,

    /// Current position in execution history (for stepping backward/forward)
    history_position: usize,

    /// Transcript length visible at the current history position
    visible_output_len: Option<usize>,

    /// Whether execution has finished
    finished: bool,
}

impl Interpreter {
    /// Create an interpreter reading stdin and writing stdout
    pub fn new(program: Program, config: MachineConfig) -> Self {
        Interpreter {
            program,
            config,
            state: MachineState::new(),
            input: Box::new(ReaderInput::stdin()),
            output: Box::new(io::stdout()),
            transcript: Transcript::new(),
            block_hits: FxHashMap::default(),
            current_point: None,
            snapshot_manager: config.history_limit.map(SnapshotManager::new),
            history_position: 0,
            visible_output_len: None,
            finished: false,
        }
    }

    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Run the program from start to finish
    ///
    /// Each top-level block starts at depth 0. The first error aborts the run;
    /// the machine state and transcript keep whatever happened before it.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        if self.finished {
            return Ok(());
        }

        // Take initial snapshot
        self.take_snapshot()?;

        let program = std::mem::take(&mut self.program);
        let result = program.blocks.iter().try_for_each(|block| {
            debug!(
                id = block.id,
                line = block.location.line,
                counter = self.state.instruction_counter,
                "running top-level block"
            );
            self.execute_block(block, 0)
        });
        self.program = program;

        self.finished = true;
        debug!(
            instructions = self.state.instruction_counter,
            pointer = self.state.pointer(),
            snapshot_bytes = self
                .snapshot_manager
                .as_ref()
                .map_or(0, SnapshotManager::memory_usage),
            ok = result.is_ok(),
            "run finished"
        );
        result
    }

    /// Execute one block at the given nesting depth
    ///
    /// A conditional whose guard cell is zero skips its body but still counts
    /// as an instruction and still moves the pointer by the default rule.
    pub(crate) fn execute_block(&mut self, block: &Block, depth: usize) -> Result<(), RuntimeError> {
        if depth > self.config.max_nesting_depth {
            return Err(RuntimeError::NestingTooDeep {
                limit: self.config.max_nesting_depth,
                location: block.location,
            });
        }

        if block.kind == BlockKind::Conditional && self.state.tape.current() == 0 {
            trace!(id = block.id, depth, "conditional skipped");
            return self.finish_block(block, depth, 0, true);
        }

        // Only literals directly inside this block contribute
        let mut pointer_override = 0i64;
        for item in &block.items {
            match item {
                Item::Literal(literal) => {
                    pointer_override += self.execute_literal(literal, depth)?;
                }
                Item::Block(child) => self.execute_block(child, depth + 1)?,
            }
        }

        self.finish_block(block, depth, pointer_override, false)
    }

    /// Count the block as one instruction, move the pointer and record it
    fn finish_block(
        &mut self,
        block: &Block,
        depth: usize,
        pointer_override: i64,
        skipped: bool,
    ) -> Result<(), RuntimeError> {
        self.state.finish_instruction(pointer_override);
        *self.block_hits.entry(block.id).or_insert(0) += 1;
        self.current_point = Some(ExecutionPoint {
            block: block.id,
            kind: block.kind,
            location: block.location,
            depth,
            skipped,
        });

        trace!(
            id = block.id,
            depth,
            counter = self.state.instruction_counter,
            pointer = self.state.pointer(),
            pointer_override,
            "block finished"
        );

        self.take_snapshot()
    }

    /// Take a snapshot of the current execution state
    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        let Some(manager) = self.snapshot_manager.as_mut() else {
            return Ok(());
        };

        manager.push(Snapshot {
            state: self.state,
            point: self.current_point,
            output_len: self.transcript.len(),
        })?;

        self.history_position = manager.len() - 1;
        Ok(())
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, index: usize) -> Result<(), RuntimeError> {
        let snapshot = self
            .snapshot_manager
            .as_ref()
            .and_then(|manager| manager.get(index))
            .copied()
            .ok_or_else(|| RuntimeError::HistoryOperationFailed {
                message: "Snapshot not found in history".to_string(),
            })?;

        self.state = snapshot.state;
        self.current_point = snapshot.point;
        self.visible_output_len = Some(snapshot.output_len);
        self.history_position = index;
        Ok(())
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "Already at the beginning of execution".to_string(),
            });
        }
        self.restore_snapshot(self.history_position - 1)
    }

    /// Step forward in execution (restore next snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.total_snapshots() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No more snapshots available (execution finished)".to_string(),
            });
        }
        self.restore_snapshot(self.history_position + 1)
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        if self.total_snapshots() == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
            });
        }
        self.restore_snapshot(0)
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        match self.total_snapshots() {
            0 => Err(RuntimeError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
            }),
            total => self.restore_snapshot(total - 1),
        }
    }

    // ========== Getter methods for UI ==========

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn tape(&self) -> &Tape {
        &self.state.tape
    }

    pub fn pointer(&self) -> usize {
        self.state.pointer()
    }

    pub fn instruction_counter(&self) -> u64 {
        self.state.instruction_counter
    }

    /// The full transcript of everything the run wrote
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Output written up to the current history position
    pub fn visible_output(&self) -> &str {
        let text = self.transcript.text();
        match self.visible_output_len {
            Some(len) => &text[..len.min(text.len())],
            None => text,
        }
    }

    pub fn current_point(&self) -> Option<&ExecutionPoint> {
        self.current_point.as_ref()
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.as_ref().map_or(0, SnapshotManager::len)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Executions per block id
    pub fn block_hits(&self) -> &FxHashMap<NodeId, u64> {
        &self.block_hits
    }

    /// The `n` most executed blocks, ties broken by ascending id
    pub fn hottest_blocks(&self, n: usize) -> Vec<(NodeId, u64)> {
        let mut hits: Vec<(NodeId, u64)> = self.block_hits.iter().map(|(&id, &c)| (id, c)).collect();
        hits.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        hits.truncate(n);
        hits
    }
}
