//! Growable ring buffer backing [`BoundedDeque`](crate::BoundedDeque).
//!
//! The buffer is a single raw allocation addressed through a head index and a
//! length. Elements wrap around the end of the allocation, so pushes and pops
//! at either end are O(1) and never move other elements. Growth doubles the
//! allocation; [`RingBuffer::rescale_to`] reallocates at an exact size.

use std::{
    alloc::{self, handle_alloc_error, Layout},
    fmt,
    iter::{self, FusedIterator},
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ptr::{self, NonNull},
    slice,
};

pub struct RingBuffer<T> {
    buf: NonNull<T>,
    cap: usize,
    head: usize,
    len: usize,
    _marker: PhantomData<T>,
}

// SAFETY: the buffer owns its elements exactly like a `Vec<T>` does.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Sync> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    const MIN_NON_ZERO_CAP: usize = if mem::size_of::<T>() == 1 {
        8
    } else if mem::size_of::<T>() <= 1024 {
        4
    } else {
        1
    };

    #[inline]
    pub const fn new() -> Self {
        let cap = if mem::size_of::<T>() == 0 { usize::MAX } else { 0 };
        Self { buf: NonNull::dangling(), cap, head: 0, len: 0, _marker: PhantomData }
    }

    /// Allocates room for exactly `cap` elements.
    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        let mut this = Self::new();
        if cap > this.cap {
            // SAFETY: cap > this.cap, and a ZST would have this.cap == usize::MAX
            unsafe { this.grow_to(cap) }
        }
        this
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current allocation holds without growing.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    // this will never panic, as self.cap >= self.len is guaranteed.
    #[inline]
    const fn is_contiguous(&self) -> bool {
        self.head <= self.cap - self.len
    }

    #[inline]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let ptr = self.buf.as_ptr();
        if self.is_contiguous() {
            let slice = unsafe { slice::from_raw_parts(ptr.add(self.head), self.len) };
            (slice, &[])
        } else {
            let cap = self.cap;
            let tail = self.head + self.len - cap;
            let slice1 = unsafe { slice::from_raw_parts(ptr.add(self.head), cap - self.head) };
            let slice2 = unsafe { slice::from_raw_parts(ptr, tail) };
            (slice1, slice2)
        }
    }

    #[inline]
    fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let ptr = self.buf.as_ptr();
        if self.is_contiguous() {
            let slice = unsafe { slice::from_raw_parts_mut(ptr.add(self.head), self.len) };
            (slice, &mut [])
        } else {
            let cap = self.cap;
            let tail = self.head + self.len - cap;
            let slice1 = unsafe { slice::from_raw_parts_mut(ptr.add(self.head), cap - self.head) };
            let slice2 = unsafe { slice::from_raw_parts_mut(ptr, tail) };
            (slice1, slice2)
        }
    }

    #[inline]
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            Some(unsafe { &*self.buf.as_ptr().add(self.head) })
        }
    }

    #[inline]
    pub fn back(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            Some(unsafe { &*self.buf.as_ptr().add(self.wrap_idx(self.len - 1)) })
        }
    }

    /// Note that idx must be in the range of [0..self.cap) for this to work properly
    #[inline]
    fn wrap_idx(&self, idx: usize) -> usize {
        // written this way so that ZSTs (cap == usize::MAX) never overflow
        if idx < self.cap - self.head {
            self.head + idx
        } else {
            self.head.wrapping_add(idx).wrapping_sub(self.cap)
        }
    }

    #[inline]
    fn tail(&self) -> usize {
        self.wrap_idx(self.len)
    }

    pub fn reserve(&mut self, additional: usize) {
        let new_cap = self.len.checked_add(additional).expect("capacity overflow");
        if new_cap > self.cap {
            // a ZST has self.cap == usize::MAX, so we only get here for sized T,
            // where self.cap <= isize::MAX and the doubling can't overflow
            let new_cap = (self.cap * 2).max(new_cap).max(Self::MIN_NON_ZERO_CAP);
            unsafe { self.grow_to(new_cap) }
        }
    }

    #[inline]
    fn reserve_for_push(&mut self) {
        if self.len == self.cap {
            if mem::size_of::<T>() == 0 {
                panic!("capacity overflow");
            } else {
                // SAFETY: T is not a ZST, so self.cap <= isize::MAX and the new
                // capacity is strictly greater than the old one
                unsafe { self.grow_to((self.cap * 2).max(Self::MIN_NON_ZERO_CAP)) }
            }
        }
    }

    #[inline]
    pub fn push_back(&mut self, val: T) {
        self.reserve_for_push();

        // SAFETY: there's guaranteed to be free space at self.tail
        unsafe { self.buf.as_ptr().add(self.tail()).write(val) };
        self.len += 1;
    }

    #[inline]
    pub fn push_front(&mut self, val: T) {
        self.reserve_for_push();

        let new_head = self.head.checked_sub(1).unwrap_or(self.cap - 1);

        // SAFETY: reserve_for_push() left at least one free slot before self.head
        unsafe { self.buf.as_ptr().add(new_head).write(val) };
        self.head = new_head;
        self.len += 1;
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        // keep the value alive in a ManuallyDrop until the indices are consistent
        let val = ManuallyDrop::new(unsafe { self.buf.as_ptr().add(self.head).read() });
        self.len -= 1;
        self.head = if self.head == self.cap - 1 { 0 } else { self.head + 1 };

        Some(ManuallyDrop::into_inner(val))
    }

    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let new_tail = self.tail().checked_sub(1).unwrap_or(self.cap - 1);

        let val = ManuallyDrop::new(unsafe { self.buf.as_ptr().add(new_tail).read() });
        self.len -= 1;

        Some(ManuallyDrop::into_inner(val))
    }

    /// Drops every element. The allocation is kept.
    pub fn clear(&mut self) {
        let (front, back) = self.as_mut_slices();
        let front: *mut [T] = front;
        let back: *mut [T] = back;

        // reset first: if a destructor panics we leak instead of double dropping
        self.head = 0;
        self.len = 0;

        unsafe {
            let _back_dropper = Dropper(&mut *back);
            ptr::drop_in_place(front);
        }
    }

    /// Moves the elements into a fresh allocation of exactly `new_cap` slots,
    /// preserving their order. The allocation never drops below `len()`.
    pub fn rescale_to(&mut self, new_cap: usize) {
        let mut fresh = Self::with_capacity(new_cap.max(self.len));

        let (front, back) = self.as_slices();
        // SAFETY: fresh has room for self.len elements and the two buffers are
        // distinct allocations. Ownership moves to fresh once self.len is zeroed.
        unsafe {
            let dst = fresh.buf.as_ptr();
            ptr::copy_nonoverlapping(front.as_ptr(), dst, front.len());
            ptr::copy_nonoverlapping(back.as_ptr(), dst.add(front.len()), back.len());
        }
        fresh.len = self.len;

        self.len = 0;
        self.head = 0;
        *self = fresh;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        let (i1, i2) = self.as_slices();
        Iter { i1: i1.iter(), i2: i2.iter() }
    }

    /// Consumes the buffer, returning its elements front to back.
    pub fn into_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(iter::from_fn(|| self.pop_front()));
        out
    }

    /// # Safety
    /// `new_cap` must be greater than `self.cap`, which also rules out ZSTs.
    #[cold]
    unsafe fn grow_to(&mut self, new_cap: usize) {
        let layout = Self::array_layout(new_cap);

        let ptr = if self.cap == 0 {
            alloc::alloc(layout)
        } else {
            // Safety: this layout is already allocated, so it can't overflow.
            let cur_layout = Self::array_layout_unchecked(self.cap);
            alloc::realloc(self.buf.as_ptr().cast(), cur_layout, layout.size())
        };
        self.buf = match NonNull::new(ptr.cast::<T>()) {
            Some(buf) => buf,
            None => handle_alloc_error(layout),
        };

        // the wrapped head segment moves to the end of the larger allocation.
        // is_contiguous() still sees the old cap here, which is what we want.
        if !self.is_contiguous() {
            let shift = new_cap - self.cap;
            let head_len = self.cap - self.head;
            let head_ptr = self.buf.as_ptr().add(self.head);

            ptr::copy(head_ptr, head_ptr.add(shift), head_len);

            self.head += shift;
        }

        self.cap = new_cap;
    }

    #[inline]
    fn array_layout(len: usize) -> Layout {
        match Layout::array::<T>(len) {
            Ok(l) if l.size() <= isize::MAX as _ => l,
            _ => panic!("capacity overflow"),
        }
    }

    #[inline]
    unsafe fn array_layout_unchecked(len: usize) -> Layout {
        Layout::from_size_align_unchecked(mem::size_of::<T>() * len, mem::align_of::<T>())
    }
}

struct Dropper<'a, T>(&'a mut [T]);

impl<'a, T> Drop for Dropper<'a, T> {
    fn drop(&mut self) {
        unsafe { ptr::drop_in_place(self.0) }
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        struct DeallocGuard {
            ptr: NonNull<u8>,
            layout: Layout,
        }

        impl Drop for DeallocGuard {
            fn drop(&mut self) {
                if self.layout.size() != 0 {
                    unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
                }
            }
        }

        let layout = unsafe { Self::array_layout_unchecked(self.cap) };
        let _guard = DeallocGuard { ptr: self.buf.cast(), layout };

        self.clear();
    }
}

impl<T> Default for RingBuffer<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for val in iter {
            self.push_back(val);
        }
    }
}

impl<T> FromIterator<T> for RingBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, T> {
    i1: slice::Iter<'a, T>,
    i2: slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self.i1.next() {
            Some(t) => Some(t),
            None => {
                mem::swap(&mut self.i1, &mut self.i2);
                self.i1.next()
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.i1.len() + self.i2.len();
        (len, Some(len))
    }

    #[inline]
    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        let acc = self.i1.fold(init, &mut f);
        self.i2.fold(acc, f)
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        match self.i2.next_back() {
            Some(t) => Some(t),
            None => {
                mem::swap(&mut self.i1, &mut self.i2);
                self.i2.next_back()
            }
        }
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    #[inline]
    fn clone(&self) -> Self {
        Self { i1: self.i1.clone(), i2: self.i2.clone() }
    }
}
