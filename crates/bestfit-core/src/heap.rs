//! Index-reporting binary heap.
//!
//! A binary heap that reports every position change of every element
//! to an external observer. The observer keeps a back-pointer from
//! each element to its current heap slot, which is what makes O(log n)
//! removal at an arbitrary index possible for the memory manager's
//! free-segment view.

/// Sentinel index meaning "not currently stored in the heap".
pub const NULL_INDEX: usize = usize::MAX;

/// Receives a notification every time an element's index changes.
///
/// `index_changed` fires once on insertion, twice per swap (once per
/// swapped element), and once with [`NULL_INDEX`] when an element is
/// removed.
pub trait IndexObserver<T> {
    fn index_changed(&mut self, element: &T, new_index: usize);
}

impl<T, F> IndexObserver<T> for F
where
    F: FnMut(&T, usize),
{
    fn index_changed(&mut self, element: &T, new_index: usize) {
        self(element, new_index);
    }
}

/// Binary heap with an index-change observer.
///
/// `compare(a, b) == true` means `a` must sort before `b` (a strict
/// weak ordering). The element that sorts first is at the root.
///
/// The observer is passed to each mutating operation rather than
/// stored at construction, so the caller can hand in a mutable borrow
/// of whatever structure holds the back-pointers.
pub struct IndexedHeap<T, C> {
    elements: Vec<T>,
    compare: C,
}

impl<T, C> IndexedHeap<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    /// Creates an empty heap with the given comparator.
    pub fn new(compare: C) -> Self {
        Self {
            elements: Vec::new(),
            compare,
        }
    }

    /// Inserts a value and returns its final heap index.
    pub fn push<O: IndexObserver<T>>(&mut self, value: T, observer: &mut O) -> usize {
        self.elements.push(value);
        let index = self.len() - 1;
        observer.index_changed(&self.elements[index], index);
        self.sift_up(index, observer)
    }

    /// Removes the element at `index`.
    ///
    /// A non-last element is first swapped with the last one, then the
    /// vacated position is re-sifted down *and* up: the element moved
    /// in from the tail may belong on either side of its new parent.
    /// The removed element is notified with [`NULL_INDEX`].
    pub fn erase<O: IndexObserver<T>>(&mut self, index: usize, observer: &mut O) {
        let last = self.len() - 1;
        if index != last {
            self.swap_elements(index, last, observer);
            observer.index_changed(&self.elements[last], NULL_INDEX);
            self.elements.pop();
            self.sift_down(index, observer);
            self.sift_up(index, observer);
        } else {
            observer.index_changed(&self.elements[last], NULL_INDEX);
            self.elements.pop();
        }
    }

    /// Returns the root element without removing it.
    ///
    /// Calling this on an empty heap is a contract violation and
    /// panics; callers must check [`is_empty`](Self::is_empty) first.
    pub fn top(&self) -> &T {
        &self.elements[0]
    }

    /// Removes the root element.
    ///
    /// Same precondition as [`top`](Self::top).
    pub fn pop<O: IndexObserver<T>>(&mut self, observer: &mut O) {
        self.erase(0, observer);
    }

    /// Borrows the element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the heap holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(index: usize) -> usize {
        (index - 1) / 2
    }

    fn left_child(index: usize) -> usize {
        2 * index + 1
    }

    fn right_child(index: usize) -> usize {
        2 * index + 2
    }

    fn compare_at(&self, first: usize, second: usize) -> bool {
        (self.compare)(&self.elements[first], &self.elements[second])
    }

    fn swap_elements<O: IndexObserver<T>>(&mut self, first: usize, second: usize, observer: &mut O) {
        self.elements.swap(first, second);
        observer.index_changed(&self.elements[first], first);
        observer.index_changed(&self.elements[second], second);
    }

    fn sift_up<O: IndexObserver<T>>(&mut self, mut index: usize, observer: &mut O) -> usize {
        while index != 0 && self.compare_at(index, Self::parent(index)) {
            self.swap_elements(index, Self::parent(index), observer);
            index = Self::parent(index);
        }
        index
    }

    fn sift_down<O: IndexObserver<T>>(&mut self, mut index: usize, observer: &mut O) {
        while Self::left_child(index) < self.len() {
            // Descend toward whichever child sorts first.
            let mut child = Self::left_child(index);
            let right = Self::right_child(index);
            if right < self.len() && self.compare_at(right, child) {
                child = right;
            }
            if self.compare_at(index, child) {
                return;
            }
            self.swap_elements(index, child, observer);
            index = child;
        }
    }
}
