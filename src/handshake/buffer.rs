//! Reassembly of handshake messages from unordered fragments.
//!
//! [`FragmentBuffer`] accepts handshake record payloads in any order, merges
//! their fragments into one [`AssemblySlot`] per message sequence number and
//! hands completed messages out strictly in sequence order, one sequence
//! number after another. Every byte it
//! holds is charged against a single cap so a hostile peer cannot grow it
//! without bound.

use std::collections::{BTreeMap, btree_map::Entry};

use tracing::{debug, warn};

use super::{
    BufferError,
    Fragment,
    FragmentHeader,
    FragmentSplitter,
    HandshakeMessage,
    HandshakeType,
    MessageSequence,
    outcome::{DatagramOutcome, PushOutcome, PushReport},
    slot::AssemblySlot,
};
use crate::{
    config::BufferConfig,
    metrics,
    record::{ContentType, Epoch, RecordSplitter},
};

/// Identity fixed for a message by the first fragment planned in a push.
#[derive(Clone, Copy)]
struct PlannedSlot {
    msg_type: HandshakeType,
    total: u32,
}

/// Buffer that reassembles handshake messages for one session.
///
/// # Examples
///
/// ```
/// use handshake_reassembly::{
///     handshake::FragmentBuffer,
///     record::{ContentType, Epoch},
/// };
///
/// let mut buffer = FragmentBuffer::default();
/// // ServerHelloDone (type 14) with an empty body, sequence 0.
/// let payload = [14, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
/// let outcome = buffer
///     .push(ContentType::Handshake, Epoch::new(0), &payload)
///     .expect("well-formed payload");
/// assert!(outcome.is_handshake());
///
/// let message = buffer.pop().expect("message complete");
/// assert_eq!(message.as_bytes(), &payload);
/// assert!(buffer.pop().is_none());
/// ```
#[derive(Debug, Default)]
pub struct FragmentBuffer {
    config: BufferConfig,
    slots: BTreeMap<MessageSequence, AssemblySlot>,
    buffered: usize,
    popped_through: Option<MessageSequence>,
}

impl FragmentBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new(config: BufferConfig) -> Self {
        Self {
            config,
            slots: BTreeMap::new(),
            buffered: 0,
            popped_through: None,
        }
    }

    /// Configuration the buffer was built with.
    #[must_use]
    pub const fn config(&self) -> &BufferConfig { &self.config }

    /// Bytes currently charged against the cap.
    #[must_use]
    pub const fn buffered_bytes(&self) -> usize { self.buffered }

    /// Number of messages still missing fragments.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        let policy = self.config.completion;
        self.slots.values().filter(|s| !s.is_complete(policy)).count()
    }

    /// Number of complete messages, including any still waiting behind an
    /// incomplete earlier sequence number.
    #[must_use]
    pub fn ready_len(&self) -> usize {
        let policy = self.config.completion;
        self.slots.values().filter(|s| s.is_complete(policy)).count()
    }

    /// Lowest message sequence still accepted, or `None` once sequence
    /// `u16::MAX` has been handed out.
    #[must_use]
    pub fn next_sequence(&self) -> Option<MessageSequence> {
        self.popped_through
            .map_or(Some(MessageSequence::default()), MessageSequence::checked_next)
    }

    /// Merge one record's payload.
    ///
    /// Records that are not handshake content are reported as
    /// [`PushOutcome::NotHandshake`] and leave the buffer untouched. A
    /// handshake payload is split into fragments, every fragment is checked,
    /// and only then are they merged, so an error leaves the buffer exactly
    /// as it was.
    ///
    /// Fragments for messages already handed out by [`pop`](Self::pop) are
    /// counted as stale and dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Fragment`] for malformed fragment framing,
    /// [`BufferError::TotalLengthMismatch`] or
    /// [`BufferError::MessageTypeMismatch`] when a fragment contradicts an
    /// earlier one for the same message, and [`BufferError::Overflow`] when
    /// the new messages would exceed the byte cap.
    pub fn push(
        &mut self,
        content_type: ContentType,
        epoch: Epoch,
        payload: &[u8],
    ) -> Result<PushOutcome, BufferError> {
        if !content_type.is_handshake() {
            return Ok(PushOutcome::NotHandshake);
        }
        match self.admit(epoch, payload) {
            Ok(report) => Ok(PushOutcome::Handshake(report)),
            Err(err) => Err(reject(err)),
        }
    }

    /// Split a raw datagram into records and push each of them.
    ///
    /// Non-handshake records are returned for the caller to dispatch.
    /// Records are processed one at a time: when a later record fails, the
    /// fragments of earlier records in the same datagram stay merged.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Record`] when a record header declares more
    /// payload than the datagram holds, or any error [`push`](Self::push)
    /// returns for a handshake record.
    pub fn push_datagram<'a>(
        &mut self,
        datagram: &'a [u8],
    ) -> Result<DatagramOutcome<'a>, BufferError> {
        let mut outcome = DatagramOutcome::default();
        let mut records = RecordSplitter::new(datagram);

        for record in records.by_ref() {
            let record = record.map_err(|err| reject(err.into()))?;
            let header = record.header;
            match self.push(header.content_type, header.epoch, record.payload)? {
                PushOutcome::NotHandshake => outcome.passthrough.push(record),
                PushOutcome::Handshake(report) => {
                    outcome.handshake_records += 1;
                    outcome.report.absorb(report);
                }
            }
        }

        outcome.trailing = records.remainder();
        Ok(outcome)
    }

    /// Remove and return the message at [`next_sequence`](Self::next_sequence)
    /// once it is complete.
    ///
    /// Returns `None` while that message is missing or incomplete, even when
    /// later messages are already complete; they wait their turn.
    pub fn pop(&mut self) -> Option<HandshakeMessage> {
        let policy = self.config.completion;
        let seq = self.next_sequence()?;
        if !self.slots.get(&seq)?.is_complete(policy) {
            return None;
        }
        let slot = self.slots.remove(&seq)?;
        self.buffered = self.buffered.saturating_sub(slot.charge());
        self.popped_through = Some(seq);

        let message = slot.into_message();
        debug!(
            message_seq = %seq,
            epoch = %message.epoch(),
            length = message.header().length,
            "handing out reassembled handshake message"
        );
        metrics::inc_messages_reassembled();
        metrics::set_buffered_bytes(self.buffered);
        Some(message)
    }

    fn is_stale(&self, seq: MessageSequence) -> bool {
        self.popped_through.is_some_and(|popped| seq <= popped)
    }

    fn admit(&mut self, epoch: Epoch, payload: &[u8]) -> Result<PushReport, BufferError> {
        let fragments: Vec<Fragment<'_>> =
            FragmentSplitter::new(payload).collect::<Result<_, _>>()?;
        self.check_admissible(&fragments)?;
        Ok(self.commit(epoch, &fragments))
    }

    /// Validate every fragment against existing slots and the byte cap
    /// without changing anything.
    fn check_admissible(&self, fragments: &[Fragment<'_>]) -> Result<(), BufferError> {
        let mut planned: BTreeMap<MessageSequence, PlannedSlot> = BTreeMap::new();
        let mut new_charge: usize = 0;

        for Fragment { header, .. } in fragments {
            let seq = header.message_seq;
            if self.is_stale(seq) {
                continue;
            }
            let expected = match self.slots.get(&seq) {
                Some(slot) => PlannedSlot {
                    msg_type: slot.msg_type(),
                    total: slot.total(),
                },
                None => match planned.entry(seq) {
                    Entry::Occupied(entry) => *entry.get(),
                    Entry::Vacant(entry) => {
                        new_charge = new_charge.saturating_add(slot_charge(header));
                        *entry.insert(PlannedSlot {
                            msg_type: header.msg_type,
                            total: header.length,
                        })
                    }
                },
            };
            check_consistent(&expected, header)?;
        }

        let attempted = self.buffered.saturating_add(new_charge);
        let limit = self.config.max_buffered_bytes;
        if attempted > limit.get() {
            return Err(BufferError::Overflow { attempted, limit });
        }
        Ok(())
    }

    fn commit(&mut self, epoch: Epoch, fragments: &[Fragment<'_>]) -> PushReport {
        let policy = self.config.completion;
        let mut report = PushReport {
            fragments: fragments.len(),
            ..PushReport::default()
        };

        for Fragment { header, body } in fragments {
            let seq = header.message_seq;
            if self.is_stale(seq) {
                debug!(message_seq = %seq, "dropping fragment of a message already handed out");
                report.stale_fragments += 1;
                continue;
            }

            let (slot, created) = match self.slots.entry(seq) {
                Entry::Occupied(entry) => (entry.into_mut(), false),
                Entry::Vacant(entry) => {
                    let slot = AssemblySlot::new(header, epoch);
                    self.buffered += slot.charge();
                    report.opened += 1;
                    (entry.insert(slot), true)
                }
            };
            // Complete messages are frozen; only an empty message starts so.
            if !created && slot.is_complete(policy) {
                continue;
            }
            report.new_bytes += slot.merge(header, body) as usize;
            if slot.is_complete(policy) {
                report.completed += 1;
                debug!(message_seq = %seq, %epoch, "handshake message complete");
            }
        }

        metrics::inc_fragments(
            metrics::FragmentOutcome::Accepted,
            report.fragments - report.stale_fragments,
        );
        metrics::inc_fragments(metrics::FragmentOutcome::Stale, report.stale_fragments);
        metrics::set_buffered_bytes(self.buffered);
        report
    }
}

/// Bytes a new slot for `header` is charged: the zero-filled destination
/// buffer, header included.
fn slot_charge(header: &FragmentHeader) -> usize {
    FragmentHeader::LEN.saturating_add(header.length as usize)
}

fn check_consistent(expected: &PlannedSlot, header: &FragmentHeader) -> Result<(), BufferError> {
    if header.length != expected.total {
        return Err(BufferError::TotalLengthMismatch {
            message_seq: header.message_seq,
            expected: expected.total,
            found: header.length,
        });
    }
    if header.msg_type != expected.msg_type {
        return Err(BufferError::MessageTypeMismatch {
            message_seq: header.message_seq,
            expected: expected.msg_type,
            found: header.msg_type,
        });
    }
    Ok(())
}

fn reject(err: BufferError) -> BufferError {
    warn!(kind = err.kind().as_str(), error = %err, "rejected handshake input");
    metrics::inc_errors(err.kind());
    err
}
