use crate::benchmark::{AvgTimeBenchmark, Benchmark, BenchmarkError, IterationContext};
use crate::data::TestObject;
use crate::domain::model::{CollectionFamily, CollectionKind, CollectionReportEntry, CollectionRun};
use crate::suite::SuitePlan;
use crate::utils::error::{BenchError, Result};
use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::collections::{BTreeSet, BinaryHeap, HashSet, LinkedList, VecDeque};
use std::time::Duration;

const LIST_OPERATIONS: &[&str] = &[
    "listAddBegin",
    "listAddEnd",
    "listAddRandom",
    "listRemoveRandom",
    "listRemoveEnd",
    "listRemoveBegin",
    "listFullBrowseIterator",
    "listFullBrowseForLoop",
];

const SET_OPERATIONS: &[&str] = &["setAdd", "setRemove", "setFullBrowse", "setExists"];

const QUEUE_OPERATIONS: &[&str] = &[
    "queueAddEnd",
    "queueRemoveRandom",
    "queueRemoveEnd",
    "queueFullBrowseIterator",
    "queueFullBrowseDrain",
];

const DEQUE_OPERATIONS: &[&str] = &[
    "dequeAddBegin",
    "dequeAddEnd",
    "dequeRemoveRandom",
    "dequeRemoveEnd",
    "dequeRemoveBegin",
    "dequeFullBrowseIterator",
    "dequeFullBrowsePop",
];

pub fn operations(family: CollectionFamily) -> &'static [&'static str] {
    match family {
        CollectionFamily::List => LIST_OPERATIONS,
        CollectionFamily::Set => SET_OPERATIONS,
        CollectionFamily::Queue => QUEUE_OPERATIONS,
        CollectionFamily::Deque => DEQUE_OPERATIONS,
    }
}

/// Common surface of every collection under test.
pub trait BenchCollection: Default {
    type Iter<'a>: Iterator<Item = &'a TestObject>
    where
        Self: 'a;

    /// Replaces the contents with `data`.
    fn refill(&mut self, data: &[TestObject]);
    fn size(&self) -> usize;
    fn elements(&self) -> Self::Iter<'_>;
}

pub trait ListCollection: BenchCollection {
    /// `index` must be `<= size()`.
    fn insert_at(&mut self, index: usize, value: TestObject);
    fn get(&self, index: usize) -> Option<&TestObject>;
    fn push_back(&mut self, value: TestObject);
    fn remove_value(&mut self, value: &TestObject) -> Option<TestObject>;
    fn pop_back(&mut self) -> Option<TestObject>;
    fn pop_front(&mut self) -> Option<TestObject>;
}

pub trait SetCollection: BenchCollection {
    fn insert(&mut self, value: TestObject) -> bool;
    fn remove(&mut self, value: &TestObject) -> bool;
    fn contains(&self, value: &TestObject) -> bool;
}

pub trait QueueCollection: BenchCollection {
    fn offer(&mut self, value: TestObject);
    fn poll(&mut self) -> Option<TestObject>;
    fn remove_value(&mut self, value: &TestObject) -> bool;
}

pub trait DequeCollection: BenchCollection {
    fn push_front(&mut self, value: TestObject);
    fn push_back(&mut self, value: TestObject);
    fn pop_front(&mut self) -> Option<TestObject>;
    fn pop_back(&mut self) -> Option<TestObject>;
    fn remove_value(&mut self, value: &TestObject) -> bool;
}

impl BenchCollection for Vec<TestObject> {
    type Iter<'a> = std::slice::Iter<'a, TestObject>;

    fn refill(&mut self, data: &[TestObject]) {
        self.clear();
        self.extend_from_slice(data);
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl ListCollection for Vec<TestObject> {
    fn insert_at(&mut self, index: usize, value: TestObject) {
        self.insert(index, value);
    }

    fn get(&self, index: usize) -> Option<&TestObject> {
        self.as_slice().get(index)
    }

    fn push_back(&mut self, value: TestObject) {
        self.push(value);
    }

    fn remove_value(&mut self, value: &TestObject) -> Option<TestObject> {
        let index = self.iter().position(|v| v == value)?;
        Some(self.remove(index))
    }

    fn pop_back(&mut self) -> Option<TestObject> {
        self.pop()
    }

    fn pop_front(&mut self) -> Option<TestObject> {
        if self.is_empty() {
            None
        } else {
            Some(self.remove(0))
        }
    }
}

impl BenchCollection for LinkedList<TestObject> {
    type Iter<'a> = std::collections::linked_list::Iter<'a, TestObject>;

    fn refill(&mut self, data: &[TestObject]) {
        self.clear();
        self.extend(data.iter().cloned());
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl ListCollection for LinkedList<TestObject> {
    fn insert_at(&mut self, index: usize, value: TestObject) {
        let mut tail = self.split_off(index);
        LinkedList::push_back(self, value);
        self.append(&mut tail);
    }

    // 逐節點走訪，O(n)
    fn get(&self, index: usize) -> Option<&TestObject> {
        self.iter().nth(index)
    }

    fn push_back(&mut self, value: TestObject) {
        LinkedList::push_back(self, value);
    }

    fn remove_value(&mut self, value: &TestObject) -> Option<TestObject> {
        unlink(self, value)
    }

    fn pop_back(&mut self) -> Option<TestObject> {
        LinkedList::pop_back(self)
    }

    fn pop_front(&mut self) -> Option<TestObject> {
        LinkedList::pop_front(self)
    }
}

fn unlink(list: &mut LinkedList<TestObject>, value: &TestObject) -> Option<TestObject> {
    let index = list.iter().position(|v| v == value)?;
    let mut tail = list.split_off(index);
    let removed = tail.pop_front();
    list.append(&mut tail);
    removed
}

impl DequeCollection for LinkedList<TestObject> {
    fn push_front(&mut self, value: TestObject) {
        LinkedList::push_front(self, value);
    }

    fn push_back(&mut self, value: TestObject) {
        LinkedList::push_back(self, value);
    }

    fn pop_front(&mut self) -> Option<TestObject> {
        LinkedList::pop_front(self)
    }

    fn pop_back(&mut self) -> Option<TestObject> {
        LinkedList::pop_back(self)
    }

    fn remove_value(&mut self, value: &TestObject) -> bool {
        unlink(self, value).is_some()
    }
}

impl BenchCollection for VecDeque<TestObject> {
    type Iter<'a> = std::collections::vec_deque::Iter<'a, TestObject>;

    fn refill(&mut self, data: &[TestObject]) {
        self.clear();
        self.extend(data.iter().cloned());
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

fn remove_first_match(deque: &mut VecDeque<TestObject>, value: &TestObject) -> bool {
    match deque.iter().position(|v| v == value) {
        Some(index) => deque.remove(index).is_some(),
        None => false,
    }
}

impl QueueCollection for VecDeque<TestObject> {
    fn offer(&mut self, value: TestObject) {
        VecDeque::push_back(self, value);
    }

    fn poll(&mut self) -> Option<TestObject> {
        VecDeque::pop_front(self)
    }

    fn remove_value(&mut self, value: &TestObject) -> bool {
        remove_first_match(self, value)
    }
}

impl DequeCollection for VecDeque<TestObject> {
    fn push_front(&mut self, value: TestObject) {
        VecDeque::push_front(self, value);
    }

    fn push_back(&mut self, value: TestObject) {
        VecDeque::push_back(self, value);
    }

    fn pop_front(&mut self) -> Option<TestObject> {
        VecDeque::pop_front(self)
    }

    fn pop_back(&mut self) -> Option<TestObject> {
        VecDeque::pop_back(self)
    }

    fn remove_value(&mut self, value: &TestObject) -> bool {
        remove_first_match(self, value)
    }
}

// 優先佇列：poll 取出最大值
impl BenchCollection for BinaryHeap<TestObject> {
    type Iter<'a> = std::collections::binary_heap::Iter<'a, TestObject>;

    fn refill(&mut self, data: &[TestObject]) {
        self.clear();
        self.extend(data.iter().cloned());
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl QueueCollection for BinaryHeap<TestObject> {
    fn offer(&mut self, value: TestObject) {
        self.push(value);
    }

    fn poll(&mut self) -> Option<TestObject> {
        self.pop()
    }

    fn remove_value(&mut self, value: &TestObject) -> bool {
        let before = self.len();
        self.retain(|v| v != value);
        self.len() != before
    }
}

impl BenchCollection for HashSet<TestObject> {
    type Iter<'a> = std::collections::hash_set::Iter<'a, TestObject>;

    fn refill(&mut self, data: &[TestObject]) {
        self.clear();
        self.extend(data.iter().cloned());
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl SetCollection for HashSet<TestObject> {
    fn insert(&mut self, value: TestObject) -> bool {
        HashSet::insert(self, value)
    }

    fn remove(&mut self, value: &TestObject) -> bool {
        HashSet::remove(self, value)
    }

    fn contains(&self, value: &TestObject) -> bool {
        HashSet::contains(self, value)
    }
}

impl BenchCollection for BTreeSet<TestObject> {
    type Iter<'a> = std::collections::btree_set::Iter<'a, TestObject>;

    fn refill(&mut self, data: &[TestObject]) {
        self.clear();
        self.extend(data.iter().cloned());
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl SetCollection for BTreeSet<TestObject> {
    fn insert(&mut self, value: TestObject) -> bool {
        BTreeSet::insert(self, value)
    }

    fn remove(&mut self, value: &TestObject) -> bool {
        BTreeSet::remove(self, value)
    }

    fn contains(&self, value: &TestObject) -> bool {
        BTreeSet::contains(self, value)
    }
}

impl BenchCollection for IndexSet<TestObject> {
    type Iter<'a> = indexmap::set::Iter<'a, TestObject>;

    fn refill(&mut self, data: &[TestObject]) {
        self.clear();
        self.extend(data.iter().cloned());
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

// shift_remove 保留其餘元素的插入順序
impl SetCollection for IndexSet<TestObject> {
    fn insert(&mut self, value: TestObject) -> bool {
        IndexSet::insert(self, value)
    }

    fn remove(&mut self, value: &TestObject) -> bool {
        self.shift_remove(value)
    }

    fn contains(&self, value: &TestObject) -> bool {
        IndexSet::contains(self, value)
    }
}

/// Shared state of one collection scenario.
///
/// Before every iteration the collection is reset to `data`; `stack` holds a
/// shuffled copy of `data` for operations that target existing elements.
struct Fixture<'d, C> {
    collection: RefCell<C>,
    data: &'d [TestObject],
    stack: RefCell<Vec<TestObject>>,
    rng: RefCell<StdRng>,
}

impl<'d, C: BenchCollection> Fixture<'d, C> {
    fn new(data: &'d [TestObject], seed: u64) -> Self {
        Self {
            collection: RefCell::new(C::default()),
            data,
            stack: RefCell::new(Vec::with_capacity(data.len())),
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn reset(&self, with_stack: bool) {
        self.collection.borrow_mut().refill(self.data);
        if with_stack {
            let mut stack = self.stack.borrow_mut();
            stack.clear();
            stack.extend_from_slice(self.data);
            stack.shuffle(&mut *self.rng.borrow_mut());
        }
    }

    fn random_object(&self) -> TestObject {
        TestObject::random(&mut *self.rng.borrow_mut())
    }

    fn pop_existing(&self) -> Option<TestObject> {
        self.stack.borrow_mut().pop()
    }

    fn size(&self) -> usize {
        self.collection.borrow().size()
    }

    fn measure<I, O>(
        &self,
        run: &CollectionRun,
        with_stack: bool,
        mut provider: impl FnMut(&Self) -> I,
        mut case: impl FnMut(&mut C, I, &mut IterationContext) -> O,
    ) -> std::result::Result<Duration, BenchmarkError> {
        let mut benchmark = AvgTimeBenchmark::builder()
            .warm_up_iterations(run.warm_up)
            .test_case_iterations(run.tests)
            .before_test_callback(|| self.reset(with_stack))
            .data_provider(|_| provider(self))
            .test_case(|input, ctx| case(&mut *self.collection.borrow_mut(), input, ctx))
            .build()?;
        Ok(benchmark.run())
    }

    fn browse(collection: &C, ctx: &mut IterationContext) -> usize {
        let mut seen = 0;
        for element in collection.elements() {
            ctx.consume(element);
            seen += 1;
        }
        seen
    }
}

/// Indexed walk; quadratic on a linked list.
fn browse_by_index<C: ListCollection>(collection: &C, ctx: &mut IterationContext) -> usize {
    let size = collection.size();
    for index in 0..size {
        if let Some(element) = collection.get(index) {
            ctx.consume(element);
        }
    }
    size
}

/// Checks that a removing operation really removed one element per iteration.
fn expect_one_removed<C: BenchCollection>(
    fixture: &Fixture<'_, C>,
    method: &str,
    run: &CollectionRun,
) -> Result<()> {
    if run.tests == 0 || run.size == 0 {
        return Ok(());
    }
    let size = fixture.size();
    if size != run.size - 1 {
        return Err(BenchError::ExecutionError {
            message: format!(
                "{} left {} elements, expected {}",
                method,
                size,
                run.size - 1
            ),
        });
    }
    Ok(())
}

struct Recorder<'r> {
    family: CollectionFamily,
    kind: CollectionKind,
    run: &'r CollectionRun,
    entries: Vec<CollectionReportEntry>,
}

impl<'r> Recorder<'r> {
    fn new(family: CollectionFamily, kind: CollectionKind, run: &'r CollectionRun) -> Self {
        Self {
            family,
            kind,
            run,
            entries: Vec::new(),
        }
    }

    fn record(&mut self, method: &str, avg_time: Duration) {
        tracing::debug!(
            "{} {} {} warmup={} tests={} n={}: avg {:?}",
            self.family,
            self.kind,
            method,
            self.run.warm_up,
            self.run.tests,
            self.run.size,
            avg_time
        );
        self.entries.push(CollectionReportEntry {
            method: method.to_string(),
            family: self.family,
            collection: self.kind,
            warmup: self.run.warm_up,
            tests: self.run.tests,
            size: self.run.size,
            avg_time,
        });
    }
}

fn list_suite<C: ListCollection>(
    kind: CollectionKind,
    run: &CollectionRun,
    data: &[TestObject],
    seed: u64,
) -> Result<Vec<CollectionReportEntry>> {
    let fixture = Fixture::<C>::new(data, seed);
    let mut recorder = Recorder::new(CollectionFamily::List, kind, run);

    let avg = fixture.measure(run, false, Fixture::random_object, |c, value, _| {
        c.insert_at(0, value);
        c.size()
    })?;
    recorder.record("listAddBegin", avg);

    let avg = fixture.measure(run, false, Fixture::random_object, |c, value, _| {
        c.push_back(value);
        c.size()
    })?;
    recorder.record("listAddEnd", avg);

    let avg = fixture.measure(
        run,
        false,
        |f| {
            let index = f.rng.borrow_mut().gen_range(0..=f.size());
            (index, f.random_object())
        },
        |c, (index, value), _| {
            c.insert_at(index, value);
            c.size()
        },
    )?;
    recorder.record("listAddRandom", avg);

    let avg = fixture.measure(run, true, Fixture::pop_existing, |c, value, _| {
        value.and_then(|v| c.remove_value(&v))
    })?;
    expect_one_removed(&fixture, "listRemoveRandom", run)?;
    recorder.record("listRemoveRandom", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, _| c.pop_back())?;
    expect_one_removed(&fixture, "listRemoveEnd", run)?;
    recorder.record("listRemoveEnd", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, _| c.pop_front())?;
    expect_one_removed(&fixture, "listRemoveBegin", run)?;
    recorder.record("listRemoveBegin", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, ctx| Fixture::browse(c, ctx))?;
    recorder.record("listFullBrowseIterator", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, ctx| browse_by_index(c, ctx))?;
    recorder.record("listFullBrowseForLoop", avg);

    Ok(recorder.entries)
}

fn set_suite<C: SetCollection>(
    kind: CollectionKind,
    run: &CollectionRun,
    data: &[TestObject],
    seed: u64,
) -> Result<Vec<CollectionReportEntry>> {
    let fixture = Fixture::<C>::new(data, seed);
    let mut recorder = Recorder::new(CollectionFamily::Set, kind, run);

    let avg = fixture.measure(run, false, Fixture::random_object, |c, value, ctx| {
        let added = c.insert(value);
        ctx.consume(added);
        added
    })?;
    recorder.record("setAdd", avg);

    let avg = fixture.measure(run, true, Fixture::pop_existing, |c, value, _| {
        value.map(|v| c.remove(&v)).unwrap_or(false)
    })?;
    expect_one_removed(&fixture, "setRemove", run)?;
    recorder.record("setRemove", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, ctx| Fixture::browse(c, ctx))?;
    recorder.record("setFullBrowse", avg);

    let avg = fixture.measure(run, true, Fixture::pop_existing, |c, value, _| {
        value.map(|v| c.contains(&v)).unwrap_or(false)
    })?;
    recorder.record("setExists", avg);

    Ok(recorder.entries)
}

fn queue_suite<C: QueueCollection>(
    kind: CollectionKind,
    run: &CollectionRun,
    data: &[TestObject],
    seed: u64,
) -> Result<Vec<CollectionReportEntry>> {
    let fixture = Fixture::<C>::new(data, seed);
    let mut recorder = Recorder::new(CollectionFamily::Queue, kind, run);

    let avg = fixture.measure(run, false, Fixture::random_object, |c, value, _| {
        c.offer(value);
        c.size()
    })?;
    recorder.record("queueAddEnd", avg);

    let avg = fixture.measure(run, true, Fixture::pop_existing, |c, value, _| {
        value.map(|v| c.remove_value(&v)).unwrap_or(false)
    })?;
    expect_one_removed(&fixture, "queueRemoveRandom", run)?;
    recorder.record("queueRemoveRandom", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, _| c.poll())?;
    expect_one_removed(&fixture, "queueRemoveEnd", run)?;
    recorder.record("queueRemoveEnd", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, ctx| Fixture::browse(c, ctx))?;
    recorder.record("queueFullBrowseIterator", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, ctx| {
        let mut drained = 0;
        while let Some(element) = c.poll() {
            ctx.consume(element);
            drained += 1;
        }
        drained
    })?;
    recorder.record("queueFullBrowseDrain", avg);

    Ok(recorder.entries)
}

fn deque_suite<C: DequeCollection>(
    kind: CollectionKind,
    run: &CollectionRun,
    data: &[TestObject],
    seed: u64,
) -> Result<Vec<CollectionReportEntry>> {
    let fixture = Fixture::<C>::new(data, seed);
    let mut recorder = Recorder::new(CollectionFamily::Deque, kind, run);

    let avg = fixture.measure(run, false, Fixture::random_object, |c, value, _| {
        c.push_front(value);
        c.size()
    })?;
    recorder.record("dequeAddBegin", avg);

    let avg = fixture.measure(run, false, Fixture::random_object, |c, value, _| {
        c.push_back(value);
        c.size()
    })?;
    recorder.record("dequeAddEnd", avg);

    let avg = fixture.measure(run, true, Fixture::pop_existing, |c, value, _| {
        value.map(|v| c.remove_value(&v)).unwrap_or(false)
    })?;
    expect_one_removed(&fixture, "dequeRemoveRandom", run)?;
    recorder.record("dequeRemoveRandom", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, _| c.pop_back())?;
    expect_one_removed(&fixture, "dequeRemoveEnd", run)?;
    recorder.record("dequeRemoveEnd", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, _| c.pop_front())?;
    expect_one_removed(&fixture, "dequeRemoveBegin", run)?;
    recorder.record("dequeRemoveBegin", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, ctx| Fixture::browse(c, ctx))?;
    recorder.record("dequeFullBrowseIterator", avg);

    let avg = fixture.measure(run, false, |_| (), |c, _, ctx| {
        let mut popped = 0;
        while let Some(element) = c.pop_front() {
            ctx.consume(element);
            popped += 1;
        }
        popped
    })?;
    recorder.record("dequeFullBrowsePop", avg);

    Ok(recorder.entries)
}

fn run_family(
    family: CollectionFamily,
    kind: CollectionKind,
    run: &CollectionRun,
    data: &[TestObject],
    seed: u64,
) -> Result<Vec<CollectionReportEntry>> {
    use CollectionFamily as F;
    use CollectionKind as K;

    match (family, kind) {
        (F::List, K::Vec) => list_suite::<Vec<TestObject>>(kind, run, data, seed),
        (F::List, K::LinkedList) => list_suite::<LinkedList<TestObject>>(kind, run, data, seed),
        (F::Set, K::HashSet) => set_suite::<HashSet<TestObject>>(kind, run, data, seed),
        (F::Set, K::BTreeSet) => set_suite::<BTreeSet<TestObject>>(kind, run, data, seed),
        (F::Set, K::IndexSet) => set_suite::<IndexSet<TestObject>>(kind, run, data, seed),
        (F::Queue, K::VecDeque) => queue_suite::<VecDeque<TestObject>>(kind, run, data, seed),
        (F::Queue, K::BinaryHeap) => queue_suite::<BinaryHeap<TestObject>>(kind, run, data, seed),
        (F::Deque, K::VecDeque) => deque_suite::<VecDeque<TestObject>>(kind, run, data, seed),
        (F::Deque, K::LinkedList) => deque_suite::<LinkedList<TestObject>>(kind, run, data, seed),
        (family, kind) => Err(BenchError::ExecutionError {
            message: format!("{} does not implement the {} interface", kind, family),
        }),
    }
}

/// Runs every family x implementation x run shape in `plan`.
pub fn run_collection_suite(plan: &SuitePlan) -> Result<Vec<CollectionReportEntry>> {
    let mut rng = StdRng::seed_from_u64(plan.seed);
    let mut entries = Vec::with_capacity(plan.collection_scenario_count());

    for &family in &plan.collection_families {
        for &kind in family.kinds() {
            tracing::info!("📚 Benchmarking {} as {}", kind, family);
            for run in &plan.collection_runs {
                let data = TestObject::random_list(run.size, &mut rng);
                entries.extend(run_family(family, kind, run, &data, plan.seed)?);
            }
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SuiteKind;

    fn objects(n: usize) -> Vec<TestObject> {
        let mut rng = StdRng::seed_from_u64(4);
        TestObject::random_list(n, &mut rng)
    }

    fn small_run() -> CollectionRun {
        CollectionRun {
            warm_up: 2,
            tests: 3,
            size: 20,
        }
    }

    #[test]
    fn test_linked_list_insert_and_remove_in_the_middle() {
        let data = objects(5);
        let mut list: LinkedList<TestObject> = LinkedList::new();
        list.refill(&data);

        let extra = objects(6).pop().unwrap();
        list.insert_at(2, extra.clone());
        assert_eq!(list.iter().nth(2), Some(&extra));
        assert_eq!(list.size(), 6);

        assert_eq!(ListCollection::remove_value(&mut list, &data[3]), Some(data[3].clone()));
        assert_eq!(list.size(), 5);
        assert!(!list.contains(&data[3]));
    }

    #[test]
    fn test_vec_pop_front_on_empty() {
        let mut list: Vec<TestObject> = Vec::new();
        assert!(ListCollection::pop_front(&mut list).is_none());
    }

    #[test]
    fn test_binary_heap_remove_value() {
        let data = objects(10);
        let mut heap: BinaryHeap<TestObject> = BinaryHeap::new();
        heap.refill(&data);
        assert!(QueueCollection::remove_value(&mut heap, &data[4]));
        assert!(!QueueCollection::remove_value(&mut heap, &data[4]));
        assert_eq!(heap.size(), 9);
    }

    #[test]
    fn test_list_suite_reports_every_operation() {
        let data = objects(20);
        let run = small_run();
        let entries =
            list_suite::<LinkedList<TestObject>>(CollectionKind::LinkedList, &run, &data, 1).unwrap();

        let methods: Vec<&str> = entries.iter().map(|e| e.method.as_str()).collect();
        assert_eq!(methods, LIST_OPERATIONS);
        assert!(entries.iter().all(|e| e.size == 20 && e.tests == 3));
    }

    #[test]
    fn test_every_family_and_kind_runs() {
        let data = objects(20);
        let run = small_run();
        for family in CollectionFamily::ALL {
            for &kind in family.kinds() {
                let entries = run_family(family, kind, &run, &data, 1).unwrap();
                assert_eq!(entries.len(), operations(family).len(), "{} {}", family, kind);
                assert!(entries.iter().all(|e| e.collection == kind));
            }
        }
    }

    #[test]
    fn test_deque_removes_one_existing_element_per_iteration() {
        let data = objects(20);
        let run = small_run();
        let entries =
            deque_suite::<VecDeque<TestObject>>(CollectionKind::VecDeque, &run, &data, 1).unwrap();

        assert_eq!(operations(CollectionFamily::Deque).len(), 7);
        let methods: Vec<&str> = entries.iter().map(|e| e.method.as_str()).collect();
        assert_eq!(methods, DEQUE_OPERATIONS);
        assert_eq!(methods[2], "dequeRemoveRandom");
        assert!(entries.iter().all(|e| e.family == CollectionFamily::Deque));

        let mut deque: LinkedList<TestObject> = LinkedList::new();
        deque.refill(&data);
        assert!(DequeCollection::remove_value(&mut deque, &data[7]));
        assert!(!DequeCollection::remove_value(&mut deque, &data[7]));
        assert_eq!(deque.size(), 19);
    }

    #[test]
    fn test_remove_check_rejects_untouched_collection() {
        let data = objects(8);
        let run = CollectionRun {
            warm_up: 0,
            tests: 1,
            size: 8,
        };
        let fixture = Fixture::<VecDeque<TestObject>>::new(&data, 1);
        fixture.reset(false);

        let result = expect_one_removed(&fixture, "dequeRemoveRandom", &run);
        assert!(matches!(result, Err(BenchError::ExecutionError { .. })));

        fixture.collection.borrow_mut().pop_back();
        assert!(expect_one_removed(&fixture, "dequeRemoveRandom", &run).is_ok());
    }

    #[test]
    fn test_index_set_keeps_insertion_order_after_remove() {
        let data = objects(6);
        let mut set: IndexSet<TestObject> = IndexSet::new();
        set.refill(&data);

        assert!(SetCollection::remove(&mut set, &data[2]));
        assert!(!SetCollection::contains(&set, &data[2]));

        let expected: Vec<&TestObject> = data.iter().filter(|o| **o != data[2]).collect();
        let actual: Vec<&TestObject> = set.elements().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_index_set_runs_set_suite() {
        let data = objects(20);
        let entries =
            run_family(CollectionFamily::Set, CollectionKind::IndexSet, &small_run(), &data, 1).unwrap();
        assert_eq!(entries.len(), SET_OPERATIONS.len());
        assert!(entries.iter().all(|e| e.collection == CollectionKind::IndexSet));
    }

    #[test]
    fn test_browse_by_index_visits_every_element() {
        let data = objects(9);
        let mut list: LinkedList<TestObject> = LinkedList::new();
        list.refill(&data);
        assert_eq!(list.get(8), Some(&data[8]));
        assert_eq!(list.get(9), None);

        let mut ctx = IterationContext::default();
        assert_eq!(browse_by_index(&list, &mut ctx), 9);
    }

    #[test]
    fn test_mismatched_family_is_rejected() {
        let data = objects(2);
        let result = run_family(CollectionFamily::Set, CollectionKind::Vec, &small_run(), &data, 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_collection_suite_entry_count() {
        let plan = SuitePlan {
            suites: vec![SuiteKind::Collection],
            seed: 3,
            data_size: 1,
            cache_policies: vec![],
            cache_capacity: 1,
            cache_runs: vec![],
            collection_families: vec![CollectionFamily::Queue, CollectionFamily::Deque],
            collection_runs: vec![
                CollectionRun {
                    warm_up: 0,
                    tests: 2,
                    size: 5,
                },
                CollectionRun {
                    warm_up: 1,
                    tests: 2,
                    size: 10,
                },
            ],
        };

        let entries = run_collection_suite(&plan).unwrap();
        assert_eq!(entries.len(), plan.collection_scenario_count());
        assert_eq!(entries.len(), (2 * 5 + 2 * 7) * 2);
    }
}
