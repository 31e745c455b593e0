// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A fixed-size group of participants that talk only through two
//! collective operations, scatter and gather.
//!
//! Each participant runs on its own scoped thread and is handed a
//! `Communicator` that knows its rank.  Rank 0 is the root.  Every
//! value crossing between participants is encoded with the `wire`
//! layouts and sent as bytes over a channel, so nothing is shared by
//! reference.  Each collective may run once per group.

use crate::error::{RenderError, Result};
use crate::wire::{decode_slice, encode_slice, Wire};
use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::sync::WaitGroup;

/// The rank of the root participant.
pub const ROOT: usize = 0;

fn collective_error<S: Into<String>>(op: &'static str, rank: usize, reason: S) -> RenderError {
    RenderError::Collective {
        op,
        rank,
        reason: reason.into(),
    }
}

/// One participant's handle on the group.
pub struct Communicator {
    rank: usize,
    size: usize,
    // Scatter: every rank reads its item from `inbox`; only the root
    // holds the senders, one per rank including itself.
    inbox: Receiver<Vec<u8>>,
    scatter_targets: Vec<Sender<Vec<u8>>>,
    scattered: Option<WaitGroup>,
    // Gather: workers hold a sender, the root holds the receiver.  The
    // root has no sender of its own, so the channel disconnects once
    // every worker has either contributed or died.
    gather_sender: Option<Sender<(usize, Vec<u8>)>>,
    gather_inbox: Option<Receiver<(usize, Vec<u8>)>>,
    gathered: bool,
}

impl Communicator {
    /// This participant's zero-based rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of participants in the group.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether this participant is the root.
    pub fn is_root(&self) -> bool {
        self.rank == ROOT
    }

    /// Hand one item to every rank, in rank order, from the root.  The
    /// root passes `Some` with exactly one item per rank (its own
    /// included); every other rank passes `None`.  Returns this rank's
    /// item.  No rank returns until every rank has received its item.
    pub fn scatter<T: Wire>(&mut self, items: Option<&[T]>) -> Result<T> {
        let rank = self.rank;
        let barrier = self
            .scattered
            .take()
            .ok_or_else(|| collective_error("scatter", rank, "already completed for this group"))?;

        match (self.is_root(), items) {
            (true, Some(items)) => {
                if items.len() != self.size {
                    return Err(collective_error(
                        "scatter",
                        rank,
                        format!("{} items for {} ranks", items.len(), self.size),
                    ));
                }
                for (target, (item, sender)) in
                    items.iter().zip(self.scatter_targets.drain(..)).enumerate()
                {
                    sender.send(item.encode()?).map_err(|_| {
                        collective_error("scatter", rank, format!("rank {} is gone", target))
                    })?;
                }
            }
            (true, None) => {
                return Err(collective_error(
                    "scatter",
                    rank,
                    "the root must supply one item per rank",
                ))
            }
            (false, Some(_)) => {
                return Err(collective_error(
                    "scatter",
                    rank,
                    "only the root supplies scatter items",
                ))
            }
            (false, None) => {}
        }

        let bytes = self
            .inbox
            .recv()
            .map_err(|_| collective_error("scatter", rank, "the root hung up before sending"))?;
        let item = T::decode(&bytes)?;
        trace!("rank {} received {} bytes", rank, bytes.len());
        barrier.wait();
        Ok(item)
    }

    /// Collect every rank's `send` at the root, in rank order.  Every
    /// rank must contribute the same number of values.  The root passes
    /// a receive buffer with room for `size * send.len()` values; rank
    /// `r`'s contribution lands at offset `r * send.len()`, and anything
    /// past the last contribution is left untouched.  Other ranks pass
    /// `None`.
    pub fn gather<T: Wire + Clone>(&mut self, send: &[T], recv: Option<&mut [T]>) -> Result<()> {
        let rank = self.rank;
        if self.gathered {
            return Err(collective_error(
                "gather",
                rank,
                "already completed for this group",
            ));
        }
        self.gathered = true;

        if !self.is_root() {
            if recv.is_some() {
                return Err(collective_error(
                    "gather",
                    rank,
                    "only the root supplies a receive buffer",
                ));
            }
            let sender = self
                .gather_sender
                .take()
                .ok_or_else(|| collective_error("gather", rank, "no route to the root"))?;
            let bytes = encode_slice(send)?;
            trace!("rank {} sending {} bytes", rank, bytes.len());
            return sender
                .send((rank, bytes))
                .map_err(|_| collective_error("gather", rank, "the root is gone"));
        }

        let recv = recv.ok_or_else(|| {
            collective_error("gather", rank, "the root must supply a receive buffer")
        })?;
        let count = send.len();
        if recv.len() < count * self.size {
            return Err(collective_error(
                "gather",
                rank,
                format!(
                    "receive buffer holds {} values, {} ranks of {} need {}",
                    recv.len(),
                    self.size,
                    count,
                    count * self.size
                ),
            ));
        }
        let inbox = self
            .gather_inbox
            .take()
            .ok_or_else(|| collective_error("gather", rank, "no inbox at the root"))?;

        recv[..count].clone_from_slice(send);
        let mut seen = vec![false; self.size];
        seen[ROOT] = true;
        for _ in 1..self.size {
            let (from, bytes) = inbox.recv().map_err(|_| {
                collective_error("gather", rank, "a worker hung up before contributing")
            })?;
            if from >= self.size || seen[from] {
                return Err(collective_error(
                    "gather",
                    rank,
                    format!("unexpected contribution from rank {}", from),
                ));
            }
            let values = decode_slice::<T>(&bytes)?;
            if values.len() != count {
                return Err(collective_error(
                    "gather",
                    rank,
                    format!(
                        "rank {} contributed {} values, expected {}",
                        from,
                        values.len(),
                        count
                    ),
                ));
            }
            recv[from * count..(from + 1) * count].clone_from_slice(&values);
            seen[from] = true;
        }
        Ok(())
    }
}

/// A group whose size is fixed when it is brought up.
#[derive(Debug)]
pub struct ProcessGroup {
    size: usize,
}

impl ProcessGroup {
    /// Bring up a group of `size` participants.
    pub fn init(size: usize) -> Result<ProcessGroup> {
        if size == 0 {
            return Err(RenderError::Bootstrap(
                "a process group needs at least one participant".to_string(),
            ));
        }
        info!("process group of {} participants", size);
        Ok(ProcessGroup { size })
    }

    /// Number of participants.
    pub fn size(&self) -> usize {
        self.size
    }

    fn communicators(&self) -> Vec<Communicator> {
        let (gather_sender, gather_inbox) = channel::unbounded();
        let (senders, inboxes): (Vec<_>, Vec<_>) =
            (0..self.size).map(|_| channel::bounded(1)).unzip();
        let barrier = WaitGroup::new();

        let mut senders = Some(senders);
        inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| {
                let root = rank == ROOT;
                Communicator {
                    rank,
                    size: self.size,
                    inbox,
                    scatter_targets: if root {
                        senders.take().unwrap_or_default()
                    } else {
                        Vec::new()
                    },
                    scattered: Some(barrier.clone()),
                    gather_sender: if root {
                        None
                    } else {
                        Some(gather_sender.clone())
                    },
                    gather_inbox: if root {
                        Some(gather_inbox.clone())
                    } else {
                        None
                    },
                    gathered: false,
                }
            })
            .collect()
    }

    /// Run `participant` once per rank, each on its own thread, and
    /// return what every rank produced, in rank order.  The first
    /// failing rank's error is returned; a rank that panics is reported
    /// as a failed collective.
    pub fn run<F, R>(&self, participant: F) -> Result<Vec<R>>
    where
        F: Fn(Communicator) -> Result<R> + Sync,
        R: Send,
    {
        let communicators = self.communicators();
        let participant = &participant;

        let outcome = crossbeam::scope(|scope| {
            let mut handles = Vec::with_capacity(communicators.len());
            for comm in communicators {
                let rank = comm.rank();
                let handle = scope
                    .builder()
                    .name(format!("rank-{}", rank))
                    .spawn(move |_| participant(comm))
                    .map_err(|err| {
                        RenderError::Bootstrap(format!("cannot start rank {}: {}", rank, err))
                    })?;
                handles.push((rank, handle));
            }

            let results: Vec<Result<R>> = handles
                .into_iter()
                .map(|(rank, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(collective_error("run", rank, "participant panicked")))
                })
                .collect();
            results.into_iter().collect::<Result<Vec<R>>>()
        });

        outcome.unwrap_or_else(|_| Err(collective_error("run", ROOT, "participant panicked")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Pixel;
    use crate::geometry::Bound;

    #[test]
    fn empty_group_fails_to_start() {
        match ProcessGroup::init(0) {
            Err(RenderError::Bootstrap(_)) => {}
            other => panic!("expected a bootstrap error, got {:?}", other),
        }
    }

    #[test]
    fn every_rank_gets_its_own_item() {
        let group = ProcessGroup::init(5).unwrap();
        let items: Vec<Bound> = (0..5).map(|i| Bound::new(i, i * 10)).collect();
        let received = group
            .run(|mut comm| {
                if comm.is_root() {
                    comm.scatter(Some(&items[..]))
                } else {
                    comm.scatter::<Bound>(None)
                }
            })
            .unwrap();
        assert_eq!(received, items);
    }

    #[test]
    fn gather_places_contributions_in_rank_order() {
        let group = ProcessGroup::init(4).unwrap();
        let gathered = group
            .run(|mut comm| {
                let level = comm.rank() as u8;
                let send = vec![Pixel::gray(level); 3];
                if comm.is_root() {
                    let mut recv = vec![Pixel::new(9, 9, 9); 14];
                    comm.gather(&send[..], Some(&mut recv[..]))?;
                    Ok(Some(recv))
                } else {
                    comm.gather(&send[..], None)?;
                    Ok(None)
                }
            })
            .unwrap();

        let recv = gathered[0].as_ref().unwrap();
        for rank in 0..4 {
            for i in 0..3 {
                assert_eq!(recv[rank * 3 + i], Pixel::gray(rank as u8));
            }
        }
        // Past the last contribution nothing is written.
        assert_eq!(&recv[12..], &[Pixel::new(9, 9, 9), Pixel::new(9, 9, 9)]);
        assert!(gathered[1..].iter().all(Option::is_none));
    }

    #[test]
    fn single_rank_group_scatters_and_gathers_to_itself() {
        let group = ProcessGroup::init(1).unwrap();
        let out = group
            .run(|mut comm| {
                let b = comm.scatter(Some(&[Bound::new(2, 1)][..]))?;
                let mut recv = vec![Pixel::default(); 2];
                comm.gather(&[Pixel::gray(1), Pixel::gray(2)][..], Some(&mut recv[..]))?;
                Ok((b, recv))
            })
            .unwrap();
        assert_eq!(out[0].0, Bound::new(2, 1));
        assert_eq!(out[0].1, vec![Pixel::gray(1), Pixel::gray(2)]);
    }

    #[test]
    fn root_with_wrong_item_count_fails() {
        let group = ProcessGroup::init(3).unwrap();
        let result = group.run(|mut comm| {
            if comm.is_root() {
                comm.scatter(Some(&[Bound::new(1, 1)][..]))
            } else {
                comm.scatter::<Bound>(None)
            }
        });
        match result {
            Err(RenderError::Collective { op: "scatter", .. }) => {}
            other => panic!("expected a scatter error, got {:?}", other),
        }
    }

    #[test]
    fn second_scatter_is_refused() {
        let group = ProcessGroup::init(1).unwrap();
        let result = group.run(|mut comm| {
            comm.scatter(Some(&[Bound::new(1, 1)][..]))?;
            comm.scatter(Some(&[Bound::new(1, 1)][..]))
        });
        assert!(result.is_err());
    }

    #[test]
    fn mismatched_contribution_is_refused() {
        let group = ProcessGroup::init(2).unwrap();
        let result = group.run(|mut comm| {
            if comm.is_root() {
                let mut recv = vec![Pixel::default(); 4];
                comm.gather(&[Pixel::default(); 2][..], Some(&mut recv[..]))
            } else {
                comm.gather(&[Pixel::default(); 1][..], None)
            }
        });
        match result {
            Err(RenderError::Collective { op: "gather", .. }) => {}
            other => panic!("expected a gather error, got {:?}", other),
        }
    }

    #[test]
    fn panicking_worker_does_not_hang_the_root() {
        let group = ProcessGroup::init(3).unwrap();
        let result = group.run(|mut comm| {
            if comm.rank() == 2 {
                panic!("worker down");
            }
            let mut recv = vec![Pixel::default(); 3];
            if comm.is_root() {
                comm.gather(&[Pixel::default()][..], Some(&mut recv[..]))
            } else {
                comm.gather(&[Pixel::default()][..], None)
            }
        });
        assert!(result.is_err());
    }
}
