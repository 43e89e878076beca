//! In-memory archive: ordered indices and navigation.
//!
//! The parser hands over a flat list of records. [`Archive`] keeps them by
//! message number and builds the orderings every renderer walks:
//!
//! | Ordering | Key |
//! |----------|-----|
//! | date     | `(date, msgnum)` |
//! | subject  | `(lowercase subject without Re:, date, msgnum)` |
//! | author   | `(lowercase name, date, msgnum)` |
//! | thread   | pre-order thread list from the parser |
//!
//! The orderings are `BTreeSet`s, so an in-order traversal is plain
//! iteration. Deleted messages stay in every ordering; traversals filter
//! them out through [`Filter`], while navigation helpers skip them.

use crate::dates;
use crate::types::{ArchiveInput, EmailRecord, Reply, ThreadItem};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

/// Sort order of an index traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Date,
    Subject,
    Author,
}

/// Restricts a traversal to one period and/or folder.
///
/// Deleted messages never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct Filter<'a> {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub folder: Option<&'a str>,
}

impl<'a> Filter<'a> {
    pub fn folder(folder: &'a str) -> Self {
        Self {
            folder: Some(folder),
            ..Self::default()
        }
    }

    pub fn matches(&self, email: &EmailRecord) -> bool {
        if email.is_deleted() {
            return false;
        }
        if let Some(folder) = self.folder
            && email.folder() != folder
        {
            return false;
        }
        if self.year.is_none() && self.month.is_none() {
            return true;
        }
        match dates::year_month(email.date) {
            Some((year, month)) => {
                self.year.is_none_or(|y| y == year) && self.month.is_none_or(|m| m == month)
            }
            None => false,
        }
    }
}

/// A date bucket of the output tree (`2024/05/`).
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub name: String,
    /// Live (non-deleted) messages in the folder.
    pub count: usize,
    pub first_date: Option<i64>,
    pub last_date: Option<i64>,
}

pub struct Archive {
    messages: BTreeMap<u32, EmailRecord>,
    by_msgid: HashMap<String, u32>,
    by_date: BTreeSet<(i64, u32)>,
    by_subject: BTreeSet<(String, i64, u32)>,
    by_author: BTreeSet<(String, i64, u32)>,
    replies: Vec<Reply>,
    threads: Vec<ThreadItem>,
    thread_pos: HashMap<u32, usize>,
    folders: Vec<Folder>,
}

impl Archive {
    pub fn new(input: ArchiveInput) -> Self {
        let mut messages = BTreeMap::new();
        for mut email in input.messages {
            if email.unre_subject.is_empty() {
                email.unre_subject = email.grouping_subject();
            }
            let num = email.msgnum;
            if messages.insert(num, email).is_some() {
                log::warn!("duplicate message number {num}; keeping the last record");
            }
        }

        // Keys come from the surviving records only.
        let mut by_msgid = HashMap::new();
        let mut by_date = BTreeSet::new();
        let mut by_subject = BTreeSet::new();
        let mut by_author = BTreeSet::new();
        for (&num, email) in &messages {
            if !email.msgid.is_empty() {
                by_msgid.entry(email.msgid.clone()).or_insert(num);
            }
            by_date.insert((email.date, num));
            by_subject.insert((email.unre_subject.to_lowercase(), email.date, num));
            by_author.insert((email.name.to_lowercase(), email.date, num));
        }

        let threads = if input.threads.is_empty() {
            derive_threads(&messages, &input.replies)
        } else {
            input.threads
        };
        let thread_pos = threads
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.msgnum, pos))
            .collect();
        let folders = build_folders(&messages, &input.folders);

        Self {
            messages,
            by_msgid,
            by_date,
            by_subject,
            by_author,
            replies: input.replies,
            threads,
            thread_pos,
            folders,
        }
    }

    pub fn get(&self, msgnum: u32) -> Option<&EmailRecord> {
        self.messages.get(&msgnum)
    }

    pub fn by_msgid(&self, msgid: &str) -> Option<&EmailRecord> {
        self.by_msgid.get(msgid).and_then(|num| self.get(*num))
    }

    /// All records, deleted ones included, by message number.
    pub fn messages(&self) -> impl Iterator<Item = &EmailRecord> {
        self.messages.values()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn first_msgnum(&self) -> Option<u32> {
        self.messages.keys().next().copied()
    }

    pub fn max_msgnum(&self) -> Option<u32> {
        self.messages.keys().next_back().copied()
    }

    /// In-order traversal of one ordering, restricted by `filter`.
    pub fn sorted(&self, order: SortOrder, filter: &Filter) -> Vec<&EmailRecord> {
        let nums: Vec<u32> = match order {
            SortOrder::Date => self.by_date.iter().map(|(_, n)| *n).collect(),
            SortOrder::Subject => self.by_subject.iter().map(|(_, _, n)| *n).collect(),
            SortOrder::Author => self.by_author.iter().map(|(_, _, n)| *n).collect(),
        };
        nums.into_iter()
            .filter_map(|n| self.get(n))
            .filter(|e| filter.matches(e))
            .collect()
    }

    pub fn live_count(&self, filter: &Filter) -> usize {
        self.messages.values().filter(|e| filter.matches(e)).count()
    }

    /// Earliest and latest date among matching messages.
    pub fn date_range(&self, filter: &Filter) -> Option<(i64, i64)> {
        let mut dates = self
            .by_date
            .iter()
            .filter(|(_, n)| self.get(*n).is_some_and(|e| filter.matches(e)))
            .map(|(d, _)| *d);
        let first = dates.next()?;
        Some((first, dates.last().unwrap_or(first)))
    }

    /// Next live message by number.
    pub fn next_message(&self, msgnum: u32) -> Option<&EmailRecord> {
        self.messages
            .range((Bound::Excluded(msgnum), Bound::Unbounded))
            .map(|(_, e)| e)
            .find(|e| !e.is_deleted())
    }

    /// Previous live message by number.
    pub fn previous_message(&self, msgnum: u32) -> Option<&EmailRecord> {
        self.messages
            .range(..msgnum)
            .rev()
            .map(|(_, e)| e)
            .find(|e| !e.is_deleted())
    }

    /// Messages whose previous/next links can lead to `msgnum`: on each
    /// side, every message up to and including the nearest live one.
    pub fn number_neighbours(&self, msgnum: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let before = self.messages.range(..msgnum).rev();
        let after = self.messages.range((Bound::Excluded(msgnum), Bound::Unbounded));
        for side in [before.collect::<Vec<_>>(), after.collect()] {
            for (num, email) in side {
                out.push(*num);
                if !email.is_deleted() {
                    break;
                }
            }
        }
        out
    }

    /// Messages whose "next in thread" link can lead to `msgnum`: walking
    /// back through its thread up to the nearest live message or the root.
    pub fn thread_predecessors(&self, msgnum: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let Some(&pos) = self.thread_pos.get(&msgnum) else {
            return out;
        };
        if self.threads[pos].level == 0 {
            return out;
        }
        for item in self.threads[..pos].iter().rev() {
            out.push(item.msgnum);
            let live = self.get(item.msgnum).is_some_and(|e| !e.is_deleted());
            if live || item.level == 0 {
                break;
            }
        }
        out
    }

    /// The message following `msgnum` in its thread. `None` at the end of
    /// the thread list or where the next thread starts.
    pub fn next_in_thread(&self, msgnum: u32, skip_deleted: bool) -> Option<&EmailRecord> {
        let pos = *self.thread_pos.get(&msgnum)?;
        for item in &self.threads[pos + 1..] {
            if item.level == 0 {
                return None;
            }
            let email = self.get(item.msgnum)?;
            if skip_deleted && email.is_deleted() {
                continue;
            }
            return Some(email);
        }
        None
    }

    /// Parent of a message and whether the link is only a guess.
    ///
    /// An `In-Reply-To` id found in the archive wins over the reply list.
    pub fn parent(&self, email: &EmailRecord) -> Option<(&EmailRecord, bool)> {
        if let Some(parent) = email
            .in_reply_to
            .as_deref()
            .and_then(|id| self.by_msgid(id))
            .filter(|p| p.msgnum != email.msgnum)
        {
            return Some((parent, false));
        }
        self.replies
            .iter()
            .find(|r| r.msgnum == email.msgnum && r.from != email.msgnum)
            .and_then(|r| self.get(r.from).map(|p| (p, r.maybe_reply)))
    }

    /// Live replies to `msgnum` by number, with their maybe-reply flag.
    pub fn replies(&self, msgnum: u32) -> Vec<(&EmailRecord, bool)> {
        let mut found: Vec<(&EmailRecord, bool)> = self
            .replies
            .iter()
            .filter(|r| r.from == msgnum && r.msgnum != msgnum)
            .filter_map(|r| self.get(r.msgnum).map(|e| (e, r.maybe_reply)))
            .filter(|(e, _)| !e.is_deleted())
            .collect();
        found.sort_by_key(|(e, _)| e.msgnum);
        found.dedup_by_key(|(e, _)| e.msgnum);
        found
    }

    /// Numbers of all messages (deleted included) replying to `msgnum`.
    pub fn reply_numbers(&self, msgnum: u32) -> Vec<u32> {
        self.replies
            .iter()
            .filter(|r| r.from == msgnum && r.msgnum != msgnum)
            .map(|r| r.msgnum)
            .collect()
    }

    /// Pre-order thread list.
    pub fn threads(&self) -> &[ThreadItem] {
        &self.threads
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.name == name)
    }

    pub fn previous_folder(&self, name: &str) -> Option<&Folder> {
        let pos = self.folders.iter().position(|f| f.name == name)?;
        pos.checked_sub(1).and_then(|p| self.folders.get(p))
    }

    pub fn next_folder(&self, name: &str) -> Option<&Folder> {
        let pos = self.folders.iter().position(|f| f.name == name)?;
        self.folders.get(pos + 1)
    }

    /// Year span of live messages.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let (first, last) = self.date_range(&Filter::default())?;
        let (first_year, _) = dates::year_month(first)?;
        let (last_year, _) = dates::year_month(last)?;
        Some((first_year, last_year))
    }
}

/// Thread list built from the reply links when the parser sent none.
///
/// Roots are messages without a parent, ordered by date; children follow
/// their parent depth-first, also by date.
fn derive_threads(messages: &BTreeMap<u32, EmailRecord>, replies: &[Reply]) -> Vec<ThreadItem> {
    let mut children: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    let mut has_parent = BTreeSet::new();
    for reply in replies {
        if reply.from != reply.msgnum
            && messages.contains_key(&reply.from)
            && messages.contains_key(&reply.msgnum)
            && has_parent.insert(reply.msgnum)
        {
            children.entry(reply.from).or_default().push(reply.msgnum);
        }
    }
    let by_date = |nums: &mut Vec<u32>| {
        nums.sort_by_key(|n| (messages.get(n).map(|e| e.date).unwrap_or_default(), *n));
    };
    for list in children.values_mut() {
        by_date(list);
    }
    let mut roots: Vec<u32> = messages
        .keys()
        .filter(|n| !has_parent.contains(n))
        .copied()
        .collect();
    by_date(&mut roots);

    let mut out = Vec::with_capacity(messages.len());
    let mut seen = BTreeSet::new();
    let mut stack: Vec<(u32, u32)> = roots.into_iter().rev().map(|n| (n, 0)).collect();
    while let Some((num, level)) = stack.pop() {
        if !seen.insert(num) {
            continue;
        }
        out.push(ThreadItem { msgnum: num, level });
        if let Some(kids) = children.get(&num) {
            stack.extend(kids.iter().rev().map(|k| (*k, level + 1)));
        }
    }
    out
}

fn build_folders(messages: &BTreeMap<u32, EmailRecord>, declared: &[String]) -> Vec<Folder> {
    let mut stats: BTreeMap<&str, Folder> = BTreeMap::new();
    let mut earliest: BTreeMap<&str, i64> = BTreeMap::new();
    for email in messages.values() {
        let name = email.folder();
        if name.is_empty() {
            continue;
        }
        let slot = earliest.entry(name).or_insert(email.date);
        *slot = (*slot).min(email.date);
        let folder = stats.entry(name).or_insert_with(|| Folder {
            name: name.to_string(),
            count: 0,
            first_date: None,
            last_date: None,
        });
        if !email.is_deleted() {
            folder.count += 1;
            folder.first_date = Some(folder.first_date.map_or(email.date, |d| d.min(email.date)));
            folder.last_date = Some(folder.last_date.map_or(email.date, |d| d.max(email.date)));
        }
    }

    let mut order: Vec<String> = declared.to_vec();
    let mut undeclared: Vec<&str> = stats
        .keys()
        .filter(|name| !declared.iter().any(|d| d == *name))
        .copied()
        .collect();
    undeclared.sort_by_key(|name| (earliest.get(name).copied().unwrap_or_default(), *name));
    order.extend(undeclared.into_iter().map(str::to_string));

    order
        .into_iter()
        .map(|name| {
            stats.get(name.as_str()).cloned().unwrap_or(Folder {
                name,
                count: 0,
                first_date: None,
                last_date: None,
            })
        })
        .collect()
}
